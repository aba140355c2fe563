use ads_stub_service::{AdGroupServiceServer, CampaignServiceV2Server};
use adwire_core::client::ResolveError;
use prost_reflect::Value;
use stub_campaign_service::{
    ads_client, base_config, catalog, RecordingCampaignServiceV2, StubAdGroupService,
};


#[test]
fn catalog_discovers_both_versions() {
    let catalog = catalog();
    assert_eq!(catalog.versions(), ["v2", "v1"]);
    assert_eq!(catalog.latest_version(), "v2");
    assert_eq!(
        catalog.service_names("v1"),
        ["AdGroupService", "CampaignService"]
    );
    assert_eq!(catalog.service_names("v2"), ["CampaignService"]);
}

#[tokio::test]
async fn resolution_defaults_to_the_newest_version() {
    let client = ads_client(base_config());
    let service = client.get_service("CampaignService").unwrap();
    assert_eq!(service.version(), "v2");
    assert_eq!(service.full_name(), "adsapi.v2.services.CampaignService");
}

#[tokio::test]
async fn explicit_versions_are_honored() {
    let client = ads_client(base_config());
    let service = client
        .get_service_in_version("AdGroupService", "v1")
        .unwrap();
    assert_eq!(service.full_name(), "adsapi.v1.services.AdGroupService");

    // AdGroupService was dropped in v2.
    let err = client
        .get_service_in_version("AdGroupService", "v2")
        .unwrap_err();
    assert!(matches!(err, ResolveError::ServiceNotFound { .. }));
}

#[tokio::test]
async fn pinned_versions_win_over_per_call_requests() {
    let mut config = base_config();
    config.version = Some("v1".to_string());
    let client = ads_client(config);
    let service = client
        .get_service_in_version("CampaignService", "v2")
        .unwrap();
    assert_eq!(service.version(), "v1");
}

#[test]
fn unknown_versions_list_the_supported_ones() {
    let client = ads_client(base_config());
    let err = client
        .get_service_in_version("CampaignService", "v7")
        .unwrap_err();
    let ResolveError::UnknownVersion { version, supported } = err else {
        panic!("expected UnknownVersion, got {err:?}");
    };
    assert_eq!(version, "v7");
    assert_eq!(supported, ["v2", "v1"]);
}

#[tokio::test]
async fn concurrent_resolutions_are_independent() {
    let client = ads_client(base_config());
    let handles: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                if i % 2 == 0 {
                    client.get_service("CampaignService").map(|_| ()).unwrap();
                } else {
                    client.get_type("Campaign").unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }
}

#[tokio::test]
async fn resolved_clients_reach_their_own_version() {
    let client = ads_client(base_config());

    let mut v2 = client
        .get_service_with_transport(
            CampaignServiceV2Server::new(RecordingCampaignServiceV2),
            "CampaignService",
            Some("v2"),
            vec![],
        )
        .unwrap();
    let mut request = v2.request_for("GetCampaign").unwrap().into_dynamic().unwrap();
    request.set_field_by_name(
        "resource_name",
        Value::String("customers/1/campaigns/9".to_string()),
    );
    let response = v2.unary("GetCampaign", request).await.unwrap();
    assert_eq!(
        response.descriptor().full_name(),
        "adsapi.v2.resources.Campaign"
    );

    let mut ad_groups = client
        .get_service_with_transport(
            AdGroupServiceServer::new(StubAdGroupService),
            "AdGroupService",
            Some("v1"),
            vec![],
        )
        .unwrap();
    let request = ad_groups.request_for("GetAdGroup").unwrap();
    let response = ad_groups.unary("GetAdGroup", request).await.unwrap();
    assert_eq!(
        response.descriptor().full_name(),
        "adsapi.v1.resources.AdGroup"
    );
}
