#![allow(dead_code)]

use chrono::{DateTime, Utc};
use coursehub::application_impl::{JwtConfig, JwtHs256Codec, RealTokenService};
use coursehub::application_port::TokenService;
use coursehub::domain_model::{Clock, Identity, ManualClock, Mobile, UserId};
use coursehub::infra_memory::{MemoryRefreshTokenStore, MemoryUserDirectory};
use std::sync::Arc;
use std::time::Duration;

pub const U1: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";
pub const U1_MOBILE: &str = "09120000000";

pub struct Harness {
    pub clock: Arc<ManualClock>,
    pub directory: Arc<MemoryUserDirectory>,
    pub store: Arc<MemoryRefreshTokenStore>,
    pub service: Arc<dyn TokenService>,
}

pub fn test_config() -> JwtConfig {
    JwtConfig {
        access_secret: b"integration-access-secret".to_vec(),
        refresh_secret: b"integration-refresh-secret".to_vec(),
        access_ttl: Duration::from_secs(60 * 60),
        refresh_ttl: Duration::from_secs(365 * 24 * 60 * 60),
    }
}

pub fn u1() -> Identity {
    Identity {
        id: U1.parse().unwrap(),
        mobile: Mobile::from(U1_MOBILE),
    }
}

/// Memory-backed service with user `U1` registered. The clock starts on a
/// whole second so token and store expiries line up exactly.
pub fn harness() -> Harness {
    let start = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
    let clock = Arc::new(ManualClock::new(start));
    let dyn_clock: Arc<dyn Clock> = clock.clone();

    let directory = Arc::new(MemoryUserDirectory::new());
    directory.insert(u1());
    let store = Arc::new(MemoryRefreshTokenStore::new(dyn_clock.clone()));
    let codec = Arc::new(JwtHs256Codec::new(test_config(), dyn_clock.clone()));

    let service: Arc<dyn TokenService> = Arc::new(RealTokenService::new(
        directory.clone(),
        store.clone(),
        codec,
        dyn_clock,
    ));

    Harness {
        clock,
        directory,
        store,
        service,
    }
}

pub fn u1_id() -> UserId {
    U1.parse().unwrap()
}
