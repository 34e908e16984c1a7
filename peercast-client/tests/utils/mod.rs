pub mod mock_capture;
pub mod mock_presenter;
pub mod relay_stub;

pub use mock_capture::*;
pub use mock_connector::*;
pub use mock_presenter::*;
pub use mock_transport::*;
pub use relay_stub::*;
pub use signal_helpers::*;
