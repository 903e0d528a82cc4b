//! Domain queries against the aviation API.
//!
//! Each operation builds a [`Query`] for the `flights` endpoint and routes
//! it through the [`RequestCache`], except realtime position which always
//! goes straight to the transport.

use tracing::debug;

use crate::aviation::{FlightTransport, ParamValue, Params, RawResponse, TransportError};
use crate::cache::RequestCache;

/// The single endpoint every flight query uses.
pub const FLIGHTS_ENDPOINT: &str = "flights";

/// Status filter for flights currently in the air.
const ACTIVE_STATUS: &str = "active";

/// Default carrier filter (Vueling).
pub const DEFAULT_AIRLINE_IATA: &str = "VY";

/// Default result limit for list queries.
pub const DEFAULT_LIMIT: u32 = 5;

/// An endpoint plus its filter parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    endpoint: String,
    params: Params,
}

impl Query {
    /// Start a query against `endpoint` with no parameters.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            params: Params::new(),
        }
    }

    /// Add a parameter, replacing any earlier value for `name`.
    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Flight status queries.
pub struct FlightQueries<T> {
    cache: RequestCache<T>,
    airline_iata: String,
    default_limit: u32,
}

impl<T: FlightTransport> FlightQueries<T> {
    /// Create the query layer on top of a cache.
    ///
    /// `airline_iata` is the carrier filter applied to arrivals and
    /// realtime lookups; `default_limit` is used when a list query passes
    /// no explicit limit.
    pub fn new(cache: RequestCache<T>, airline_iata: impl Into<String>, default_limit: u32) -> Self {
        Self {
            cache,
            airline_iata: airline_iata.into(),
            default_limit,
        }
    }

    /// Look up a single flight.
    ///
    /// The free tier cannot query a flight by date, so this delegates to
    /// [`realtime_position`](Self::realtime_position): the flight is only
    /// found while it is active, and `flight_date` is ignored. A paid plan
    /// would pass it as the `flight_date` filter instead.
    pub async fn flight(
        &self,
        flight_iata: &str,
        flight_date: &str,
    ) -> Result<RawResponse, TransportError> {
        debug!(flight_iata, flight_date, "single flight lookup via realtime query");
        self.realtime_position(flight_iata).await
    }

    /// Next departures from an airport, across every carrier and status.
    ///
    /// `flight_date` is accepted for symmetry with the CLI but not sent.
    pub async fn next_departures(
        &self,
        airport_iata: &str,
        flight_date: &str,
        limit: Option<u32>,
    ) -> Result<RawResponse, TransportError> {
        let query = self.departures_query(airport_iata, limit);
        debug!(airport_iata, flight_date, "fetching next departures");
        self.cached(&query).await
    }

    /// Next active arrivals of the configured carrier at an airport.
    ///
    /// `flight_date` is accepted but not sent, as for departures.
    pub async fn next_arrivals(
        &self,
        airport_iata: &str,
        flight_date: &str,
        limit: Option<u32>,
    ) -> Result<RawResponse, TransportError> {
        let query = self.arrivals_query(airport_iata, limit);
        debug!(airport_iata, flight_date, "fetching next arrivals");
        self.cached(&query).await
    }

    /// Live position of an active flight. Never cached.
    pub async fn realtime_position(&self, flight_iata: &str) -> Result<RawResponse, TransportError> {
        let query = self.realtime_query(flight_iata);
        self.cache
            .transport()
            .call(query.endpoint(), query.params())
            .await
    }

    /// The underlying request cache.
    pub fn cache(&self) -> &RequestCache<T> {
        &self.cache
    }

    async fn cached(&self, query: &Query) -> Result<RawResponse, TransportError> {
        self.cache.get_or_fetch(query.endpoint(), query.params()).await
    }

    fn departures_query(&self, airport_iata: &str, limit: Option<u32>) -> Query {
        Query::new(FLIGHTS_ENDPOINT)
            .param("departure_airport_iata", airport_iata)
            .param("limit", limit.unwrap_or(self.default_limit))
    }

    fn arrivals_query(&self, airport_iata: &str, limit: Option<u32>) -> Query {
        Query::new(FLIGHTS_ENDPOINT)
            .param("arrival_airport_iata", airport_iata)
            .param("airline_iata", self.airline_iata.as_str())
            .param("flight_status", ACTIVE_STATUS)
            .param("limit", limit.unwrap_or(self.default_limit))
    }

    fn realtime_query(&self, flight_iata: &str) -> Query {
        Query::new(FLIGHTS_ENDPOINT)
            .param("flight_iata", flight_iata)
            .param("airline_iata", self.airline_iata.as_str())
            .param("flight_status", ACTIVE_STATUS)
    }
}
