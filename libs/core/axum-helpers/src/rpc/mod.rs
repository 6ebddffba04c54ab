//! tRPC-compatible procedure calls over a single HTTP endpoint.
//!
//! ```text
//!   GET  /api/trpc/comments.list?input={}                      query
//!   POST /api/trpc/comments.post             body: {...}        mutation
//!   GET  /api/trpc/a.list,b.list?batch=1&input={"0":..,"1":..}  batch
//! ```
//!
//! Successful calls answer `{"result":{"data":...}}`; failed calls answer
//! `{"error":{"message","code","data":{"code","httpStatus","path"}}}`.
//! A batch answers a JSON array in call order, with status 207 when the
//! calls disagree on their status.
//!
//! A service implements [`RpcProcedures`] and hands the raw request to
//! [`dispatch`], which parses, executes, shapes the response and applies the
//! [`RpcCachePolicy`].

mod cache;
mod codes;
mod envelope;
mod error;
mod procedures;
mod request;
mod response;

pub use cache::{RpcCacheConfig, RpcCachePolicy};
pub use codes::{ProcedureKind, RpcErrorCode};
pub use envelope::{RpcEnvelope, RpcErrorData, RpcErrorShape, RpcFailure, RpcResultData, RpcSuccess};
pub use error::{INTERNAL_ERROR_MESSAGE, RpcError};
pub use procedures::{RpcProcedures, dispatch, execute};
pub use request::{RpcCall, RpcQuery, RpcRejection, RpcRequest};
pub use response::{CallOutcome, RpcResponse};
