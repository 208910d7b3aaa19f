//! Transport plumbing: URL composition and the pass-through HTTP transport.

mod query;
mod transport;

pub use query::compose_url;
#[cfg(test)]
pub use transport::MockTransport;
pub use transport::{HttpTransport, Transport};
