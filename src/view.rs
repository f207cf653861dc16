use crate::client::FetchError;
use crate::models::{
    DashboardResponse, RiskAllSitesResponse, RiskDailyResponse, RiskSummaryResponse,
    TbmSummaryResponse, TbmUnconfirmedResponse,
};
use crate::period::Period;
use chrono::NaiveDate;

/// Pure projection of the current selection onto one backend request. The
/// driver refetches whenever this changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub endpoint: &'static str,
    pub site_id: Option<i64>,
    pub date: NaiveDate,
    pub period: Period,
}

impl RequestDescriptor {
    pub fn new(
        endpoint: &'static str,
        site_id: Option<i64>,
        date: NaiveDate,
        period: Period,
    ) -> Self {
        Self {
            endpoint,
            site_id,
            date,
            period,
        }
    }
}

/// Decides whether a successful response is the distinct "no data for this
/// period" terminal state rather than Ready.
pub trait ViewData {
    fn has_rows(&self) -> bool;
}

impl ViewData for DashboardResponse {
    fn has_rows(&self) -> bool {
        self.summary.total_workers > 0
    }
}

impl ViewData for RiskSummaryResponse {
    fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

impl ViewData for RiskDailyResponse {
    fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

impl ViewData for RiskAllSitesResponse {
    fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

impl ViewData for TbmSummaryResponse {
    fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }
}

impl ViewData for TbmUnconfirmedResponse {
    fn has_rows(&self) -> bool {
        self.total_attendance > 0
    }
}

impl<T> ViewData for Vec<T> {
    fn has_rows(&self) -> bool {
        !self.is_empty()
    }
}

/// One view's lifecycle. Loading covers the whole suspension window; a
/// settled request lands in exactly one of the three terminal states.
#[derive(Debug)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    Empty,
    Failed(FetchError),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            ViewState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Issues generation tokens for outgoing requests and rejects responses
/// whose token is no longer the latest. Overlapping requests from rapid
/// selector changes settle in arrival order, which is not dispatch order;
/// without the token a slow stale response would overwrite fresher state.
#[derive(Debug)]
pub struct ViewDriver<T> {
    generation: u64,
    descriptor: Option<RequestDescriptor>,
    state: ViewState<T>,
}

impl<T: ViewData> ViewDriver<T> {
    pub fn new() -> Self {
        Self {
            generation: 0,
            descriptor: None,
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    /// True when the selection no longer matches the last issued request.
    pub fn needs_fetch(&self, descriptor: &RequestDescriptor) -> bool {
        self.descriptor.as_ref() != Some(descriptor)
    }

    /// Enters Loading and returns the token the response must present.
    pub fn begin(&mut self, descriptor: RequestDescriptor) -> u64 {
        self.generation += 1;
        self.descriptor = Some(descriptor);
        self.state = ViewState::Loading;
        self.generation
    }

    /// Applies a settled request. A stale token is discarded silently and
    /// the current state is left untouched; returns whether the response
    /// was applied.
    pub fn settle(&mut self, token: u64, result: Result<T, FetchError>) -> bool {
        if token != self.generation {
            return false;
        }
        self.state = match result {
            Ok(data) if data.has_rows() => ViewState::Ready(data),
            Ok(_) => ViewState::Empty,
            Err(err) => ViewState::Failed(err),
        };
        true
    }
}

impl<T: ViewData> Default for ViewDriver<T> {
    fn default() -> Self {
        Self::new()
    }
}
