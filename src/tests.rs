
pub use setup_test::{setup_test, test_app, test_config, test_db, TestUtils};
