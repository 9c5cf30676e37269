//! Read access to resolved configuration

/// Something that can hand out configuration values by name and tell the
/// hostname of the machine. Implemented by `config::AppConfig`.
pub trait ConfigSource {
    /// Resolved value of the named variable, empty when it is unknown.
    fn get(&self, name: &str) -> String;

    /// Hostname to report in logs.
    fn hostname(&self) -> String;
}
