//! # oauthclient-resolver
//!
//! Synthesizes OAuth client descriptors for ServiceAccounts on demand.
//!
//! A ServiceAccount opts into acting as an OAuth client by carrying redirect
//! annotations. Each annotation is either a partial URI template or a
//! reference to a `Route` whose admitted ingress hosts are resolved at request
//! time.
//!
//! ## Components
//!
//! - **Annotations:** parses the annotation mapping into redirect models.
//! - **Routes:** fetches referenced routes and extracts redirect bases.
//! - **Redirect:** merges models with route bases into concrete URIs.
//! - **Client:** assembles the final, deduplicated OAuth client descriptor.
//! - **Getter:** the entry point, delegating non-ServiceAccount names upstream.

pub mod annotations;
pub mod builder;
pub mod client;
pub mod clients;
pub mod error;
pub mod getter;
pub mod models;
pub mod redirect;
pub mod reference;
pub mod routes;
pub mod tokens;

pub use crate::builder::GetterBuilder;
pub use crate::client::{ClusterRoleScopeRestriction, GrantMethod, OAuthClient, ScopeRestriction};
pub use crate::clients::{
    EventRecorder, LogEventRecorder, OAuthClientGetter, RouteClient, SecretClient,
    ServiceAccountClient,
};
pub use crate::error::{ClientError, DecodeError, UnknownGrantMethod};
pub use crate::getter::ServiceAccountOAuthClientGetter;
pub use crate::models::{Route, Secret, ServiceAccount};
pub use crate::redirect::{Model, RedirectUri};
pub use crate::reference::{JsonReferenceDecoder, RedirectReference, ReferenceDecoder};
