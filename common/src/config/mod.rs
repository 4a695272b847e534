mod manager;

pub use manager::ConfigManager;

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
