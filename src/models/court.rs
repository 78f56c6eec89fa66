use crate::api::Query;
use serde::{Deserialize, Serialize};

wire_enum! {
    CourtStatus {
        Active => "ACTIVE",
        Inactive => "INACTIVE",
        Maintenance => "MAINTENANCE",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtOwner {
    pub id: i64,
    pub full_name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub id: i64,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub price_per_hour: f64,
    pub number_of_courts: u32,
    pub open_time: String,
    pub close_time: String,
    pub status: CourtStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub owner: Option<CourtOwner>,
}

/// Body for creating or replacing a court, usually read from a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourtRequest {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: String,
    pub price_per_hour: f64,
    pub number_of_courts: u32,
    pub open_time: String,
    pub close_time: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourtSearch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl CourtSearch {
    pub fn to_query(&self) -> Query {
        Query::new()
            .with_opt("name", self.name.as_deref())
            .with_opt("address", self.address.as_deref())
            .with_opt("minPrice", self.min_price)
            .with_opt("maxPrice", self.max_price)
            .with_opt("page", self.page)
            .with_opt("size", self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_court_from_wire() {
        let court: Court = serde_json::from_value(json!({
            "id": 1,
            "name": "Sunrise Badminton",
            "address": "12 Le Loi",
            "description": "Indoor",
            "pricePerHour": 120000,
            "numberOfCourts": 6,
            "openTime": "06:00",
            "closeTime": "22:00",
            "status": "MAINTENANCE",
            "owner": { "id": 9, "fullName": "Minh", "email": "minh@example.com" }
        }))
        .unwrap();
        assert_eq!(court.status, CourtStatus::Maintenance);
        assert_eq!(court.price_per_hour, 120000.0);
        assert!(court.images.is_empty());
        assert_eq!(court.owner.unwrap().id, 9);
    }

    #[test]
    fn test_court_request_from_toml() {
        let req: CourtRequest = toml::from_str(
            r#"
name = "Riverside"
address = "5 Tran Phu"
pricePerHour = 90000
numberOfCourts = 4
openTime = "07:00"
closeTime = "21:00"
facilities = ["parking", "showers"]
"#,
        )
        .unwrap();
        assert_eq!(req.number_of_courts, 4);
        assert_eq!(req.facilities.len(), 2);

        let wire = serde_json::to_value(&req).unwrap();
        assert_eq!(wire["pricePerHour"], 90000.0);
        assert!(wire.get("images").is_none());
    }

    #[test]
    fn test_search_query_skips_unset() {
        let search = CourtSearch {
            name: Some("sun".to_string()),
            max_price: Some(150000.0),
            ..Default::default()
        };
        let pairs = search.to_query().into_pairs();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0], ("name".to_string(), "sun".to_string()));
        assert_eq!(pairs[1].0, "maxPrice");
    }
}
