use crate::period::Period;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Menu {
    #[default]
    Dashboard,
    RiskAssessment,
    Tbm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteScope {
    AllSites,
    Site(i64),
}

/// What the navigation component writes to the browser-history stack. No
/// other component may touch history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub menu: Menu,
    pub site_id: Option<i64>,
    pub is_all_sites: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackNavOutcome {
    /// Back-navigation was intercepted and mapped to the all-sites scope.
    Intercepted,
    /// Already at all-sites; default navigation proceeds (leaving the app).
    LeaveApp,
}

/// Selection state (menu, period, anchor date, site scope) with the history
/// synchronization rules of the site selector: selecting a specific site
/// pushes one entry, returning to all-sites never pushes, and a back
/// navigation from a specific site is intercepted exactly once.
#[derive(Debug)]
pub struct Navigator {
    menu: Menu,
    period: Period,
    anchor: NaiveDate,
    scope: SiteScope,
    history: Vec<HistoryEntry>,
    navigating_back: bool,
}

impl Navigator {
    /// The initial entry is written in place rather than pushed, so the
    /// very first back-navigation does not land on a duplicate of the
    /// initial view.
    pub fn new(anchor: NaiveDate) -> Self {
        let mut nav = Self {
            menu: Menu::default(),
            period: Period::default(),
            anchor,
            scope: SiteScope::AllSites,
            history: Vec::new(),
            navigating_back: false,
        };
        let entry = nav.all_sites_entry();
        nav.replace_top(entry);
        nav
    }

    pub fn menu(&self) -> Menu {
        self.menu
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn scope(&self) -> SiteScope {
        self.scope
    }

    /// The (site, date, period) tuple a fetch for the current selection
    /// should carry.
    pub fn query_scope(&self) -> (Option<i64>, NaiveDate, Period) {
        let site_id = match self.scope {
            SiteScope::AllSites => None,
            SiteScope::Site(id) => Some(id),
        };
        (site_id, self.anchor, self.period)
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    // Menu, period and date changes never touch history.

    pub fn set_menu(&mut self, menu: Menu) {
        self.menu = menu;
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn set_anchor(&mut self, anchor: NaiveDate) {
        self.anchor = anchor;
    }

    pub fn select_site(&mut self, site_id: i64) {
        self.scope = SiteScope::Site(site_id);
        if self.navigating_back {
            // Synthetic selection caused by a back-interception; pushing
            // here would loop the user through duplicate entries.
            self.navigating_back = false;
            return;
        }
        self.history.push(HistoryEntry {
            menu: self.menu,
            site_id: Some(site_id),
            is_all_sites: false,
        });
    }

    /// Explicit return to all-sites; replaces the selection only.
    pub fn select_all_sites(&mut self) {
        self.navigating_back = false;
        self.scope = SiteScope::AllSites;
    }

    /// History pop handler. The browser has already dropped the top entry
    /// by the time this runs.
    pub fn back(&mut self) -> BackNavOutcome {
        self.history.pop();
        match self.scope {
            SiteScope::Site(_) => {
                self.navigating_back = true;
                self.select_all_sites();
                let entry = self.all_sites_entry();
                self.replace_top(entry);
                BackNavOutcome::Intercepted
            }
            SiteScope::AllSites => BackNavOutcome::LeaveApp,
        }
    }

    fn all_sites_entry(&self) -> HistoryEntry {
        HistoryEntry {
            menu: self.menu,
            site_id: None,
            is_all_sites: true,
        }
    }

    fn replace_top(&mut self, entry: HistoryEntry) {
        match self.history.last_mut() {
            Some(top) => *top = entry,
            None => self.history.push(entry),
        }
    }
}
