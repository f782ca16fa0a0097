//! Refresh-cadence connectivity manager.
//!
//! Wraps "ensure connected" and "fetch the weather" behind a single
//! attempt-or-skip call, invoked only when the refresh timer is due. The two
//! concerns are split across successive refresh firings: a tick that has to
//! connect does not also fetch, so each firing spends at most one bounded
//! network operation and the control cadence is never gated on link state.

use log::{info, warn};

use crate::app::ports::NetworkPort;
use crate::weather::{WeatherCache, parse_weather};

/// Outcome of one refresh-cadence attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// No link yet; a connect attempt was issued. Fetch happens on a later
    /// firing once the station reports connected.
    Connecting,
    /// The connect attempt failed; retried on the next firing.
    ConnectFailed,
    /// Weather fetched, parsed, and cached.
    Fetched,
    /// The HTTP exchange failed at the transport level.
    RequestFailed,
    /// The endpoint answered with a non-200 status.
    HttpFailure(u16),
    /// The body did not match the expected payload schema.
    ParseFailure,
}

/// Drives connect/fetch attempts against a [`NetworkPort`], writing the
/// single [`WeatherCache`] on success.
pub struct ConnectivityManager {
    url: &'static str,
}

impl ConnectivityManager {
    pub fn new(url: &'static str) -> Self {
        Self { url }
    }

    /// Run one refresh attempt. Called at most once per refresh period.
    ///
    /// Every outcome stamps `last_attempt`; only [`AttemptOutcome::Fetched`]
    /// touches the cached outdoor fields.
    pub fn attempt(
        &mut self,
        net: &mut impl NetworkPort,
        cache: &mut WeatherCache,
        now_ms: u64,
    ) -> AttemptOutcome {
        cache.record_attempt(now_ms);

        if !net.is_connected() {
            return match net.connect() {
                Ok(()) => {
                    info!("net: connect attempt issued, fetch deferred");
                    AttemptOutcome::Connecting
                }
                Err(e) => {
                    warn!("net: connect failed — {}", e);
                    AttemptOutcome::ConnectFailed
                }
            };
        }

        let response = match net.http_get(self.url) {
            Ok(r) => r,
            Err(e) => {
                warn!("net: weather request failed — {}", e);
                return AttemptOutcome::RequestFailed;
            }
        };

        if response.status != 200 {
            warn!("net: weather endpoint returned HTTP {}", response.status);
            return AttemptOutcome::HttpFailure(response.status);
        }

        match parse_weather(&response.body) {
            Ok(reading) => {
                cache.store(reading, now_ms);
                info!(
                    "net: outdoor {:.1}C {:.0}% cached",
                    reading.temp_c, reading.humidity_pct
                );
                AttemptOutcome::Fetched
            }
            Err(e) => {
                warn!("net: weather payload rejected — {}", e);
                AttemptOutcome::ParseFailure
            }
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::HttpResponse;
    use crate::error::NetError;

    /// Scripted network double: a queue of canned responses.
    struct ScriptedNet {
        connected: bool,
        connect_ok: bool,
        responses: Vec<Result<HttpResponse, NetError>>,
        gets: usize,
    }

    impl ScriptedNet {
        fn offline() -> Self {
            Self {
                connected: false,
                connect_ok: true,
                responses: Vec::new(),
                gets: 0,
            }
        }

        fn online(responses: Vec<Result<HttpResponse, NetError>>) -> Self {
            Self {
                connected: true,
                connect_ok: true,
                responses,
                gets: 0,
            }
        }
    }

    impl NetworkPort for ScriptedNet {
        fn connect(&mut self) -> Result<(), NetError> {
            if self.connect_ok {
                Ok(())
            } else {
                Err(NetError::ConnectFailed)
            }
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn http_get(&mut self, _url: &str) -> Result<HttpResponse, NetError> {
            self.gets += 1;
            self.responses.remove(0)
        }
    }

    fn ok_body() -> HttpResponse {
        HttpResponse {
            status: 200,
            body: r#"{"main":{"temp":295.15,"humidity":55.0}}"#.to_string(),
        }
    }

    #[test]
    fn disconnected_attempt_connects_without_fetching() {
        let mut net = ScriptedNet::offline();
        let mut cache = WeatherCache::new();
        let mut mgr = ConnectivityManager::new("http://example/weather");

        let outcome = mgr.attempt(&mut net, &mut cache, 30_000);
        assert_eq!(outcome, AttemptOutcome::Connecting);
        assert_eq!(net.gets, 0, "connect tick must not also fetch");
        assert_eq!(cache.last_attempt_ms(), 30_000);
        assert!(!cache.is_valid());
    }

    #[test]
    fn connect_failure_is_reported_and_stamped() {
        let mut net = ScriptedNet::offline();
        net.connect_ok = false;
        let mut cache = WeatherCache::new();
        let mut mgr = ConnectivityManager::new("http://example/weather");

        let outcome = mgr.attempt(&mut net, &mut cache, 30_000);
        assert_eq!(outcome, AttemptOutcome::ConnectFailed);
        assert_eq!(cache.last_attempt_ms(), 30_000);
    }

    #[test]
    fn connected_attempt_fetches_and_caches() {
        let mut net = ScriptedNet::online(vec![Ok(ok_body())]);
        let mut cache = WeatherCache::new();
        let mut mgr = ConnectivityManager::new("http://example/weather");

        let outcome = mgr.attempt(&mut net, &mut cache, 60_000);
        assert_eq!(outcome, AttemptOutcome::Fetched);
        let (t, h) = cache.outdoor().unwrap();
        assert!((t - 22.0).abs() < 0.01);
        assert!((h - 55.0).abs() < 0.01);
        assert_eq!(cache.last_success_ms(), 60_000);
    }

    #[test]
    fn http_error_keeps_previous_cache_contents() {
        let mut net = ScriptedNet::online(vec![
            Ok(ok_body()),
            Ok(HttpResponse {
                status: 503,
                body: String::new(),
            }),
        ]);
        let mut cache = WeatherCache::new();
        let mut mgr = ConnectivityManager::new("http://example/weather");

        assert_eq!(
            mgr.attempt(&mut net, &mut cache, 30_000),
            AttemptOutcome::Fetched
        );
        assert_eq!(
            mgr.attempt(&mut net, &mut cache, 60_000),
            AttemptOutcome::HttpFailure(503)
        );
        let (t, h) = cache.outdoor().unwrap();
        assert!((t - 22.0).abs() < 0.01 && (h - 55.0).abs() < 0.01);
        assert_eq!(cache.last_success_ms(), 30_000);
        assert_eq!(cache.last_attempt_ms(), 60_000);
    }

    #[test]
    fn malformed_body_is_a_parse_failure() {
        let mut net = ScriptedNet::online(vec![Ok(HttpResponse {
            status: 200,
            body: r#"{"unexpected":true}"#.to_string(),
        })]);
        let mut cache = WeatherCache::new();
        let mut mgr = ConnectivityManager::new("http://example/weather");

        assert_eq!(
            mgr.attempt(&mut net, &mut cache, 30_000),
            AttemptOutcome::ParseFailure
        );
        assert!(!cache.is_valid());
    }

    #[test]
    fn transport_error_is_reported() {
        let mut net = ScriptedNet::online(vec![Err(NetError::RequestFailed)]);
        let mut cache = WeatherCache::new();
        let mut mgr = ConnectivityManager::new("http://example/weather");

        assert_eq!(
            mgr.attempt(&mut net, &mut cache, 30_000),
            AttemptOutcome::RequestFailed
        );
        assert!(!cache.is_valid());
    }
}
