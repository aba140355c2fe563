use adwire_core::catalog::Namespace;
use adwire_core::client::{ResolvedMessage, TypeError};
use stub_campaign_service::{ads_client, base_config, catalog};


#[test]
fn every_namespace_is_searchable() {
    let client = ads_client(base_config());

    for (name, full_name) in [
        ("Money", "adsapi.v1.common.Money"),
        ("CampaignStatusEnum", "adsapi.v1.enums.CampaignStatusEnum"),
        ("AdsFailure", "adsapi.v1.errors.AdsFailure"),
        ("Campaign", "adsapi.v1.resources.Campaign"),
        (
            "MutateCampaignsRequest",
            "adsapi.v1.services.MutateCampaignsRequest",
        ),
    ] {
        let message = client.get_type_in_version(name, Some("v1")).unwrap();
        assert_eq!(message.descriptor().full_name(), full_name);
    }
}

#[test]
fn every_cataloged_message_resolves_in_every_version() {
    let client = ads_client(base_config());
    let catalog = catalog();
    for version in catalog.versions() {
        for (_, name) in catalog.message_names(version) {
            let message = client
                .get_type_in_version(&name, Some(version.as_str()))
                .unwrap_or_else(|err| panic!("'{name}' in {version}: {err}"));
            assert_eq!(message.descriptor().name(), name);
        }
    }
}

#[test]
fn lookups_follow_the_namespace_priority_order() {
    let catalog = catalog();
    let (namespace, descriptor) = catalog.find_message("v1", "Money").unwrap();
    assert_eq!(namespace, Namespace::Common);
    assert_eq!(descriptor.full_name(), "adsapi.v1.common.Money");
}

#[test]
fn resolved_instances_are_default_valued() {
    let client = ads_client(base_config());
    let message = client.get_type_in_version("Campaign", Some("v1")).unwrap();
    let ResolvedMessage::Dynamic(message) = message else {
        panic!("expected the rich form");
    };
    assert_eq!(
        message.get_field_by_name("resource_name").unwrap().as_str(),
        Some("")
    );
    assert_eq!(message.get_field_by_name("id").unwrap().as_i64(), Some(0));
}

#[test]
fn generated_module_names_are_refused_with_guidance() {
    let client = ads_client(base_config());
    let err = client.get_type("campaign_pb2").unwrap_err();
    assert!(matches!(err, TypeError::RawModuleReference { .. }));
    assert!(err.to_string().contains("message name itself"));
}

#[test]
fn service_client_and_transport_names_are_refused() {
    let client = ads_client(base_config());
    for name in ["CampaignServiceClient", "campaignserviceclient", "GrpcTransport"] {
        let err = client.get_type(name).unwrap_err();
        assert!(
            matches!(err, TypeError::ServiceOrTransportName { .. }),
            "'{name}' should be refused"
        );
    }
}

#[test]
fn unknown_types_report_the_searched_version() {
    let client = ads_client(base_config());
    let err = client
        .get_type_in_version("BiddingStrategy", Some("v1"))
        .unwrap_err();
    let TypeError::NotFound { name, version } = err else {
        panic!("expected NotFound, got {err:?}");
    };
    assert_eq!(name, "BiddingStrategy");
    assert_eq!(version, "v1");
}

#[test]
fn versions_do_not_leak_into_each_other() {
    let client = ads_client(base_config());
    // TextLabel exists only in v1.
    assert!(client.get_type_in_version("TextLabel", Some("v1")).is_ok());
    assert!(matches!(
        client.get_type_in_version("TextLabel", Some("v2")).unwrap_err(),
        TypeError::NotFound { .. }
    ));
}
