// ── List query parameters ──
//
// filter `?field=value`, pagination `?page=&limit=`, sort `?sort=&order=`,
// search `?q=`.

/// Sort direction for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Query parameters accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Vec<(String, String)>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub search: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `?field=value` filter.
    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    pub fn search(mut self, q: impl Into<String>) -> Self {
        self.search = Some(q.into());
        self
    }

    /// Flatten into query pairs, filters first.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = self.filters.clone();
        if let Some(page) = self.page {
            params.push(("page".into(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".into(), limit.to_string()));
        }
        if let Some(ref sort) = self.sort {
            params.push(("sort".into(), sort.clone()));
        }
        if let Some(order) = self.order {
            params.push(("order".into(), order.as_str().into()));
        }
        if let Some(ref q) = self.search {
            params.push(("q".into(), q.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_params() {
        assert!(ListQuery::new().to_params().is_empty());
    }

    #[test]
    fn params_follow_declared_order() {
        let q = ListQuery::new()
            .filter("status", "running")
            .page(2, 25)
            .sort("created_at", SortOrder::Desc)
            .search("promo");

        let params = q.to_params();
        let pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("status", "running"),
                ("page", "2"),
                ("limit", "25"),
                ("sort", "created_at"),
                ("order", "desc"),
                ("q", "promo"),
            ]
        );
    }
}
