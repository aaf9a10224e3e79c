//! Integration tests for the object store browser

mod batch_isolation;
mod cli_contracts;
mod codec_properties;
mod hierarchy_scenario;
mod support;
