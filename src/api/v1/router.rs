use super::error::*;
use super::handler;
use crate::application_port::TokenService;
use crate::domain_model::Identity;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let refresh_token = warp::post()
        .and(warp::path!("user" / "refresh-token"))
        .and(warp::body::json())
        .and(with(server.token_service.clone()))
        .and_then(handler::refresh_token);

    let admin_user = warp::get()
        .and(warp::path!("admin" / "users" / String))
        .and(with_verification(server.token_service.clone()))
        .and(with(server.token_service.clone()))
        .and_then(handler::get_user);

    let developer_tokens = warp::post()
        .and(warp::path!("developer" / "tokens"))
        .and(developer_only(server.developer_enabled))
        .and(warp::body::json())
        .and(with(server.token_service.clone()))
        .and_then(handler::issue_developer_tokens);

    refresh_token.or(admin_user).or(developer_tokens)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

fn with_verification(
    token_service: Arc<dyn TokenService>,
) -> impl Filter<Extract = (Identity,), Error = warp::Rejection> + Clone {
    warp::header::<String>(http::header::AUTHORIZATION.as_ref()).and_then(move |token: String| {
        let token_service = token_service.clone();
        async move {
            if let Some(token) = token.strip_prefix("Bearer ") {
                let identity = token_service
                    .verify_access_token(token)
                    .await
                    .map_err(ApiErrorCode::from)
                    .map_err(reject::custom)?;
                Ok(identity)
            } else {
                Err(reject::custom(ApiErrorCode::Unauthorized))
            }
        }
    })
}

fn developer_only(enabled: bool) -> impl Filter<Extract = (), Error = warp::Rejection> + Clone {
    warp::any()
        .and_then(move || async move {
            if enabled {
                Ok(())
            } else {
                Err(reject::not_found())
            }
        })
        .untuple_one()
}
