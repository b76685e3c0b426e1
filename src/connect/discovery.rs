//! Global discovery service types
//!
//! Maps the OData payload of `api/discovery/v2.0/Instances`.

use serde::Deserialize;

/// One organization instance known to the discovery service
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiscoveredInstance {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub unique_name: Option<String>,
    pub url_name: String,
    #[serde(default)]
    pub friendly_name: Option<String>,
    pub url: String,
    pub api_url: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl DiscoveredInstance {
    pub fn display_name(&self) -> &str {
        self.friendly_name
            .as_deref()
            .or(self.unique_name.as_deref())
            .unwrap_or(&self.url_name)
    }
}

/// OData collection returned by the Instances endpoint
#[derive(Debug, Deserialize)]
pub struct DiscoveryResponse {
    #[serde(default)]
    pub value: Vec<DiscoveredInstance>,
}

/// Build the `$filter` for an organization, optionally restricted to a region.
/// Single quotes are doubled per OData string literal rules.
pub(crate) fn instance_filter(organization: &str, region_code: Option<&str>) -> String {
    let name = organization.replace('\'', "''");
    match region_code {
        Some(code) => format!(
            "UrlName eq '{}' and Region eq '{}'",
            name,
            code.replace('\'', "''")
        ),
        None => format!("UrlName eq '{}'", name),
    }
}

/// WhoAmI function response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WhoAmIResponse {
    pub user_id: String,
    #[allow(dead_code)]
    #[serde(default)]
    pub organization_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_filter() {
        assert_eq!(instance_filter("contoso", None), "UrlName eq 'contoso'");
        assert_eq!(
            instance_filter("contoso", Some("NA")),
            "UrlName eq 'contoso' and Region eq 'NA'"
        );
        assert_eq!(instance_filter("o'brien", None), "UrlName eq 'o''brien'");
    }

    #[test]
    fn test_parse_discovery_response() {
        let json = r#"{
            "@odata.context": "https://globaldisco.crm.dynamics.com/api/discovery/v2.0/$metadata#Instances",
            "value": [{
                "Id": "0c4b2a6e-0000-0000-0000-000000000000",
                "UniqueName": "org1a2b3c",
                "UrlName": "contoso",
                "FriendlyName": "Contoso Ltd",
                "State": 0,
                "Version": "9.2.24011.00000",
                "Url": "https://contoso.crm.dynamics.com",
                "ApiUrl": "https://contoso.api.crm.dynamics.com",
                "LastUpdated": "2024-01-01T00:00:00Z",
                "Region": "NA"
            }]
        }"#;

        let response: DiscoveryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.value.len(), 1);
        let instance = &response.value[0];
        assert_eq!(instance.url_name, "contoso");
        assert_eq!(instance.api_url, "https://contoso.api.crm.dynamics.com");
        assert_eq!(instance.region.as_deref(), Some("NA"));
        assert_eq!(instance.display_name(), "Contoso Ltd");
    }

    #[test]
    fn test_display_name_falls_back() {
        let instance: DiscoveredInstance = serde_json::from_str(
            r#"{"UrlName":"contoso","Url":"https://c","ApiUrl":"https://a"}"#,
        )
        .unwrap();
        assert_eq!(instance.display_name(), "contoso");
    }

    #[test]
    fn test_parse_who_am_i() {
        let who: WhoAmIResponse = serde_json::from_str(
            r#"{"@odata.context":"x","BusinessUnitId":"b","UserId":"u-1","OrganizationId":"o-1"}"#,
        )
        .unwrap();
        assert_eq!(who.user_id, "u-1");
    }
}
