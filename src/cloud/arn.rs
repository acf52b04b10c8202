//! ARN decomposition: `arn:partition:service:region:account:resource`, where
//! the resource part is further split on `/`.

use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid ARN format")]
pub struct ArnError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Arn {
    pub partition: String,
    pub service: String,
    pub region: String,
    pub account: String,
    pub resource: ArnResource,
}

/// `cluster/my-cluster` → kind `cluster`, name `my-cluster`.
/// `service/my-cluster/web` → kind `service`, parent `my-cluster`, name `web`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArnResource {
    #[serde(rename = "service")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl FromStr for Arn {
    type Err = ArnError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.splitn(6, ':');
        let (prefix, partition, service, region, account, resource) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        );
        let (Some("arn"), Some(partition), Some(service), Some(region), Some(account), Some(resource)) =
            (prefix, partition, service, region, account, resource)
        else {
            return Err(ArnError);
        };
        if partition.is_empty() || service.is_empty() || resource.is_empty() {
            return Err(ArnError);
        }

        Ok(Self {
            partition: partition.to_string(),
            service: service.to_string(),
            region: region.to_string(),
            account: account.to_string(),
            resource: ArnResource::parse(resource)?,
        })
    }
}

impl ArnResource {
    fn parse(raw: &str) -> Result<Self, ArnError> {
        let segments: Vec<&str> = raw.split('/').collect();
        match segments.as_slice() {
            [kind] => Ok(Self {
                kind: kind.to_string(),
                name: None,
                parent: None,
            }),
            [kind, middle @ .., name] => {
                if kind.is_empty() || name.is_empty() {
                    return Err(ArnError);
                }
                Ok(Self {
                    kind: kind.to_string(),
                    name: Some(name.to_string()),
                    parent: (!middle.is_empty()).then(|| middle.join("/")),
                })
            }
            [] => Err(ArnError),
        }
    }
}

/// Serializable result of decomposing an ARN; malformed input renders as
/// `{"error": "Invalid ARN format"}` rather than failing the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArnView {
    Parsed(Arn),
    Invalid { error: String },
}

impl ArnView {
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<Arn>() {
            Ok(arn) => Self::Parsed(arn),
            Err(e) => Self::Invalid {
                error: e.to_string(),
            },
        }
    }
}

/// Last `/`-separated segment, e.g. the cluster name of a cluster ARN or the
/// task id of a task ARN. Returns the input unchanged when it has no `/`.
pub fn resource_name(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_arn_decomposes() {
        let view = ArnView::parse("arn:aws:ecs:us-east-1:123456789012:cluster/my-cluster");
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "partition": "aws",
                "service": "ecs",
                "region": "us-east-1",
                "account": "123456789012",
                "resource": { "service": "cluster", "name": "my-cluster" }
            })
        );
    }

    #[test]
    fn service_arn_keeps_cluster_as_parent() {
        let arn: Arn = "arn:aws:ecs:eu-west-1:1:service/prod/web".parse().unwrap();
        assert_eq!(arn.resource.kind, "service");
        assert_eq!(arn.resource.name.as_deref(), Some("web"));
        assert_eq!(arn.resource.parent.as_deref(), Some("prod"));
    }

    #[test]
    fn iam_role_arn_has_empty_region() {
        let arn: Arn = "arn:aws:iam::123456789012:role/ecsTaskExecutionRole".parse().unwrap();
        assert_eq!(arn.region, "");
        assert_eq!(arn.resource.kind, "role");
        assert_eq!(arn.resource.name.as_deref(), Some("ecsTaskExecutionRole"));
    }

    #[test]
    fn string_without_colons_is_invalid() {
        let json = serde_json::to_value(ArnView::parse("my-cluster")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "Invalid ARN format" }));
    }

    #[test]
    fn truncated_arn_is_invalid() {
        assert_eq!("arn:aws:ecs:us-east-1".parse::<Arn>(), Err(ArnError));
        assert_eq!("arn:aws:ecs:us-east-1:1:".parse::<Arn>(), Err(ArnError));
        assert_eq!("urn:aws:ecs:us-east-1:1:cluster/x".parse::<Arn>(), Err(ArnError));
        assert_eq!("arn:aws:ecs:us-east-1:1:cluster/".parse::<Arn>(), Err(ArnError));
    }

    #[test]
    fn resource_name_takes_last_segment() {
        assert_eq!(resource_name("arn:aws:ecs:r:1:task/prod/abc123"), "abc123");
        assert_eq!(resource_name("plain"), "plain");
    }
}
