//! Catalog records as served by the booking backend.

use serde::{Deserialize, Deserializer, Serialize};

/// Response body of the catalog endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub data: Vec<ServiceCategory>,
}

/// A named group of services, shown as one section of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCategory {
    #[serde(rename = "nama_kategori", deserialize_with = "nullable_string", default)]
    pub name: String,
    #[serde(rename = "layanans", default)]
    pub services: Vec<Service>,
}

/// A single orderable offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "documentId")]
    pub id: String,
    #[serde(rename = "nama", deserialize_with = "nullable_string", default)]
    pub name: String,
    #[serde(rename = "deskripsi", deserialize_with = "nullable_string", default)]
    pub description: String,
    #[serde(rename = "satuan", deserialize_with = "nullable_string", default)]
    pub unit: String,
    /// Empty when the shop gives no estimate.
    #[serde(rename = "estimasi_waktu", deserialize_with = "nullable_string", default)]
    pub estimated_duration: String,
    #[serde(rename = "harga")]
    pub price: i64,
}

impl Service {
    pub fn has_duration(&self) -> bool {
        !self.estimated_duration.trim().is_empty()
    }
}

/// Strapi sends `null` for empty text fields.
fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_backend_payload() {
        let json = r#"{
            "data": [
                {
                    "id": 1,
                    "documentId": "cat-1",
                    "nama_kategori": "Cuci Kiloan",
                    "layanans": [
                        {
                            "documentId": "svc-1",
                            "nama": "Cuci Kering",
                            "deskripsi": "Dicuci dan dikeringkan",
                            "satuan": "kg",
                            "estimasi_waktu": "2 hari",
                            "harga": 7000
                        },
                        {
                            "documentId": "svc-2",
                            "nama": "Setrika",
                            "deskripsi": null,
                            "satuan": "kg",
                            "estimasi_waktu": null,
                            "harga": 5000
                        }
                    ]
                }
            ],
            "meta": {}
        }"#;

        let response: CatalogResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data.len(), 1);

        let category = &response.data[0];
        assert_eq!(category.name, "Cuci Kiloan");
        assert_eq!(category.services[0].id, "svc-1");
        assert_eq!(category.services[0].price, 7000);
        assert!(category.services[0].has_duration());

        let ironing = &category.services[1];
        assert_eq!(ironing.description, "");
        assert!(!ironing.has_duration());
    }

    #[test]
    fn test_missing_service_list_is_empty() {
        let response: CatalogResponse =
            serde_json::from_str(r#"{"data": [{"nama_kategori": "Kosong"}]}"#).unwrap();
        assert!(response.data[0].services.is_empty());
    }

    #[test]
    fn test_missing_price_is_rejected() {
        let result = serde_json::from_str::<Service>(r#"{"documentId": "x", "nama": "No price"}"#);
        assert!(result.is_err());
    }
}
