mod common;
mod configuration_failures;
