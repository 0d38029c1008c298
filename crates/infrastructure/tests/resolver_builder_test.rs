use splitdns_application::ports::{DnsResolver, ResponseKind};
use splitdns_domain::{Config, RecordType};
use splitdns_infrastructure::dns::{NoUpstreamResolver, ResolverBuilder};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

mod helpers;
use helpers::{request, MockNextResolver};

#[tokio::test]
async fn test_disabled_custom_dns_is_skipped() {
    let config = Config::from_toml_str("[custom_dns]\ncustom_ttl = 60\n", None).unwrap();
    let next = MockNextResolver::new();

    let resolver = ResolverBuilder::new(Arc::new(next.clone()))
        .with_custom_dns(&config.custom_dns, config.base_dir())
        .unwrap()
        .build();

    assert_eq!(resolver.name(), "mock_next");
    resolver
        .resolve(&request("printer.lan", RecordType::A), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(next.call_count().await, 1);
}

#[tokio::test]
async fn test_custom_dns_in_front_of_no_upstream() {
    let config = Config::from_toml_str(
        "[custom_dns.mapping]\n\"printer.lan\" = \"192.168.178.3\"\n",
        None,
    )
    .unwrap();

    let resolver = ResolverBuilder::new(Arc::new(NoUpstreamResolver))
        .with_custom_dns(&config.custom_dns, config.base_dir())
        .unwrap()
        .build();
    let cancel = CancellationToken::new();

    assert_eq!(resolver.name(), "custom_dns");

    let local = resolver
        .resolve(&request("printer.lan", RecordType::A), &cancel)
        .await
        .unwrap();
    assert_eq!(local.kind, ResponseKind::CustomDns);

    let other = resolver
        .resolve(&request("example.com", RecordType::A), &cancel)
        .await
        .unwrap();
    assert_eq!(other.kind, ResponseKind::NotResolved);
    assert!(other.answers.is_empty());
}

#[tokio::test]
async fn test_zone_errors_fail_the_build() {
    let config = Config::from_toml_str("[custom_dns]\nzone = \"www 60 A 10.0.0.1\"\n", None).unwrap();

    let result = ResolverBuilder::new(Arc::new(NoUpstreamResolver))
        .with_custom_dns(&config.custom_dns, config.base_dir());

    let err = result.err().expect("zone without origin must fail");
    assert!(err.to_string().contains("bad owner name"));
}

#[tokio::test]
async fn test_included_zone_resolves_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lan.zone"), "nas 300 A 192.168.178.10\n").unwrap();
    let config_path = dir.path().join("splitdns.toml");
    std::fs::write(
        &config_path,
        "[custom_dns]\nzone = \"$INCLUDE lan.zone lan.\"\n",
    )
    .unwrap();

    let config = Config::load(config_path.to_str(), Default::default()).unwrap();
    let resolver = ResolverBuilder::new(Arc::new(NoUpstreamResolver))
        .with_custom_dns(&config.custom_dns, config.base_dir())
        .unwrap()
        .build();

    let response = resolver
        .resolve(&request("nas.lan", RecordType::A), &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(response.kind, ResponseKind::CustomDns);
    assert_eq!(response.answers.len(), 1);
    assert_eq!(response.answers[0].ttl, 300);
}

#[tokio::test]
async fn test_precompiled_stage_is_used_as_is() {
    let config = Config::from_toml_str(
        "[custom_dns.client_groups.\"10.0.0.0/8\"]\nmapping = { \"office.lan\" = \"10.1.1.1\" }\n",
        None,
    )
    .unwrap();
    let compiled = config.compile_custom_dns().unwrap();

    let resolver = ResolverBuilder::new(Arc::new(NoUpstreamResolver))
        .with_compiled_custom_dns(compiled)
        .build();

    let inside = resolver
        .resolve(
            &request("office.lan", RecordType::A).with_client_ip("10.2.3.4".parse().unwrap()),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(inside.answers.len(), 1);

    let outside = resolver
        .resolve(
            &request("office.lan", RecordType::A).with_client_ip("192.168.1.1".parse().unwrap()),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
    assert_eq!(outside.kind, ResponseKind::NotResolved);
}
