//! HTTP surface of reqsift.
//!
//! | method | path            | response |
//! |--------|-----------------|----------|
//! | GET    | `/`             | banner |
//! | GET    | `/healthcheck`  | model summary as JSON |
//! | POST   | `/predict-bad/` | anomalous rows, CSV attachment |
//! | POST   | `/predict/`     | every row with its label, CSV attachment |
//! | POST   | `/summary/`     | label counts as JSON |
//!
//! Uploads are a multipart form with a `file` field, or a raw CSV body.

pub mod error;
pub mod rest;
pub mod upload;

pub use error::ApiError;
pub use rest::{
    ApiConfig, RestApi, BAD_REQUESTS_FILENAME, CSV_CONTENT_TYPE, DEFAULT_MAX_UPLOAD_BYTES,
    PREDICTIONS_FILENAME,
};
pub use upload::UPLOAD_FIELD;
