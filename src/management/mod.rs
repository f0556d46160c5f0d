mod session;

pub use session::SessionManager;
pub use session::SessionStore;
pub use session::StoreError;
