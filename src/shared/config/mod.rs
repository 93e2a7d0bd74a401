pub mod model;

pub use model::{
    CONFIG_ENV, ClientConfig, DEFAULT_PORT, EndpointConfig, LoggingConfig, Settings,
    load_settings, load_settings_from,
};

#[cfg(test)]
mod model_test;
