pub mod coordinator;
pub mod server;

pub use coordinator::LifecycleState;
pub use coordinator::ShutdownCoordinator;
pub use server::serve;
pub use server::shutdown_signal;
pub use server::ServeError;
