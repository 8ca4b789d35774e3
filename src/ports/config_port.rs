//! Configuration lookup port.
//!
//! Typed getters return the supplied default when the key is absent or its
//! value does not parse; `get_string` returns `None` for absent keys.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
