pub mod strategies;
pub mod evaluation;
pub mod service;
pub mod local_service;
pub mod mock_service;

pub use strategies::*;
pub use evaluation::*;
pub use service::*;
pub use local_service::*;
pub use mock_service::*;
