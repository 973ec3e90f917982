mod adapter_tests;
mod property_tests;
