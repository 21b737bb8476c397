//! 消息模块：runDetector / fetchHeaders 请求响应边界
pub mod handler;
pub mod protocol;

pub use self::handler::{dispatch_json, ContentHandler, MessageHandler, PageSource};
pub use self::protocol::{DetectorReport, ErrorReply, HeaderReport, Request, Response};
