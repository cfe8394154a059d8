//! Keep OAuth 2.0 sessions alive without forcing re-authentication.
//!
//! A [`flows::RefreshCoordinator`] inspects the stored credential tuple on every session
//! materialization and decides whether to reuse it, trade its refresh token for a new access
//! token, or flag the session with a refresh error. A [`flows::SessionMaterializer`] wires the
//! coordinator to any [`store::CredentialStore`] (in-memory, file-backed, or a signed session
//! token) and hands callers a [`flows::SessionView`] they can render or redirect on.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod ext;
pub mod flows;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod provider;
pub mod store;

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {httpmock as _, tokio as _, tracing_subscriber as _};
