pub mod convert_flow;
pub mod render_request;

pub use convert_flow::ConvertFlow;
pub use render_request::RenderRequest;
