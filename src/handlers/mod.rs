pub mod farms;
pub mod health;
pub mod inspections;
pub mod insights;
pub mod reports;
pub mod users;

use serde::Deserialize;

/// Shared list-endpoint query parameters. Limit is capped server-side.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl Pagination {
    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).min(100)
    }

    pub fn offset(&self) -> u64 {
        self.offset.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults_and_cap() {
        let p = Pagination {
            limit: None,
            offset: None,
        };
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 0);

        let p = Pagination {
            limit: Some(5000),
            offset: Some(40),
        };
        assert_eq!(p.limit(), 100);
        assert_eq!(p.offset(), 40);
    }
}
