pub use client::{JobHandle, QBlastClient, Retrieved};
pub use error::{QBlastError, Result};
pub use qblast_config::config::Config;
pub use qblast_config::types::{Cmd, ParamValue, ParameterBag, Status};
pub use qblast_info::QBlastInfo;
pub use query_builder::ParamsBuilder;
pub use request::{ResultsOptions, SearchOptions, SearchRequest};
pub use sleep::{Sleep, TokioSleep};
pub use transport::{BodyReader, ReqwestTransport, StreamingResponse, Transport, TransportResponse};
pub use validator::{validate_results_params, validate_search_params};

pub mod client;
pub mod error;
pub mod qblast_info;
pub mod query_builder;
pub mod request;
pub mod rules;
pub mod sleep;
pub mod transport;
pub mod validator;
