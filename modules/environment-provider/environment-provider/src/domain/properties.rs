//! Configuration keys exported for each service kind.

use environment_provider_sdk::PropertyMap;

pub const DATASOURCE_URL: &str = "spring.datasource.url";
pub const DATASOURCE_USERNAME: &str = "spring.datasource.username";
pub const DATASOURCE_PASSWORD: &str = "spring.datasource.password";

pub const KAFKA_BINDER_BROKERS: &str = "spring.cloud.stream.kafka.binder.brokers";

#[must_use]
pub fn datasource_properties(jdbc_url: &str, username: &str, password: &str) -> PropertyMap {
    PropertyMap::from([
        (DATASOURCE_URL.to_owned(), jdbc_url.to_owned()),
        (DATASOURCE_USERNAME.to_owned(), username.to_owned()),
        (DATASOURCE_PASSWORD.to_owned(), password.to_owned()),
    ])
}

#[must_use]
pub fn binder_properties(bootstrap_servers: &str) -> PropertyMap {
    PropertyMap::from([(KAFKA_BINDER_BROKERS.to_owned(), bootstrap_servers.to_owned())])
}
