pub mod mock_daemon;
pub mod pki;
