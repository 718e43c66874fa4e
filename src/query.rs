//! Query parameters for list endpoints

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

/// Expansion flags, sorting, paging and the active-only filter.
///
/// Parameters are emitted in a fixed order so requests are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    seller: bool,
    bids: bool,
    listings: bool,
    sort: Option<(String, SortOrder)>,
    limit: Option<u32>,
    page: Option<u32>,
    active: bool,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed the seller profile (`_seller`)
    pub fn with_seller(mut self) -> Self {
        self.seller = true;
        self
    }

    /// Embed the bids (`_bids`)
    pub fn with_bids(mut self) -> Self {
        self.bids = true;
        self
    }

    /// Embed the listing of each bid (`_listings`)
    pub fn with_listings(mut self) -> Self {
        self.listings = true;
        self
    }

    /// Only listings that have not ended (`_active`)
    pub fn active_only(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort = Some((field.to_string(), order));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// The active feed: seller and bids embedded, active only
    pub fn active_feed() -> Self {
        Self::new().with_seller().with_bids().active_only()
    }

    /// A single listing with seller and bids embedded
    pub fn listing_detail() -> Self {
        Self::new().with_bids().with_seller()
    }

    /// A profile's own listings or wins: newest first, first page of 100
    pub fn profile_listings() -> Self {
        Self::new()
            .with_bids()
            .with_seller()
            .sort("created", SortOrder::Descending)
            .limit(100)
            .page(1)
    }

    /// A profile's bids with their listings: newest first, first page of 100
    pub fn profile_bids() -> Self {
        Self::new()
            .with_listings()
            .sort("created", SortOrder::Descending)
            .limit(100)
            .page(1)
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if self.bids {
            params.push(("_bids".to_string(), "true".to_string()));
        }
        if self.seller {
            params.push(("_seller".to_string(), "true".to_string()));
        }
        if self.listings {
            params.push(("_listings".to_string(), "true".to_string()));
        }
        if self.active {
            params.push(("_active".to_string(), "true".to_string()));
        }
        if let Some((field, order)) = &self.sort {
            params.push(("sort".to_string(), field.clone()));
            params.push(("sortOrder".to_string(), order.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(page) = self.page {
            params.push(("page".to_string(), page.to_string()));
        }
        params
    }
}
