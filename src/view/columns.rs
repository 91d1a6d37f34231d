use crate::models::EntityKind;

use super::table::ColumnDescriptor;

/// Column set used when listing `kind`. Entries are
/// (header, path into the record, class for the data cells).
pub fn columns_for(kind: EntityKind) -> Vec<ColumnDescriptor> {
    let defs: &[(&str, &str, &str)] = match kind {
        EntityKind::Accounts => &[
            ("id", "accountId", "v-id v-acct-id"),
            ("name", "username", "v-acct-name"),
            ("email", "email", "v-acct-email"),
            ("admin", "administrator", "v-acct-admin"),
            ("connected", "location.connected", "v-acct-connected"),
            ("whenCreated", "when_account_created", "v-acct-created"),
        ],
        EntityKind::Users => &[
            ("id", "accountId", "v-id v-acct-id"),
            ("name", "username", "v-acct-name"),
            ("connected", "location.connected", "v-acct-connected"),
            ("place", "location.placeId", "v-id v-acct-place"),
            ("domain", "location.domainId", "v-id v-acct-domain"),
        ],
        EntityKind::Domains => &[
            ("id", "domainId", "v-id v-dom-id"),
            ("place", "place_name", "v-dom-place"),
            ("sponser", "sponser_accountid", "v-id v-dom-sponser"),
            ("version", "version", "v-dom-version"),
            ("netaddr", "network_addr", "v-dom-netaddr"),
            ("users", "num_users", "v-dom-users"),
            ("anon", "anon_users", "v-dom-anon"),
            ("cap", "capacity", "v-dom-capacity"),
            ("desc", "description", "v-dom-desc"),
            ("tags", "tags", "v-dom-tags"),
            ("last sender", "last_sender_key", "v-dom-sender"),
            ("last heartbeat", "time_of_last_heartbeat", "v-dom-lasthb"),
            ("created", "when_domain_entry_created", "v-dom-created"),
        ],
        EntityKind::Tokens => &[
            ("id", "tokenId", "v-id v-tok-id"),
            ("accountId", "accountId", "v-id v-tok-account"),
            ("scope", "scope", "v-tok-scope"),
            ("creation", "creation_time", "v-tok-created"),
            ("expiration", "expiration_time", "v-tok-expire"),
        ],
        EntityKind::Places => &[
            ("id", "placeId", "v-id v-place-id"),
            ("name", "name", "v-place-name"),
            ("address", "address", "v-place-address"),
            ("domain", "domain.id", "v-id v-place-domain"),
            ("domain name", "domain.name", "v-place-domain-name"),
            ("desc", "description", "v-place-desc"),
        ],
        EntityKind::Requests => &[
            ("id", "id", "v-id v-req-id"),
            ("type", "type", "v-req-type"),
            ("requester", "requesting_account_id", "v-id v-req-requester"),
            ("target", "target_account_id", "v-id v-req-target"),
            ("created", "when_created", "v-req-created"),
            ("expires", "expiration_time", "v-req-expire"),
        ],
    };
    defs.iter().map(|&c| c.into()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_an_id_column_first() {
        for kind in EntityKind::ALL {
            let cols = columns_for(kind);
            assert!(!cols.is_empty(), "{} has no columns", kind);
            assert!(cols[0].class.starts_with("v-id"), "{} first column is not an id", kind);
        }
    }

    #[test]
    fn test_domain_columns_follow_display_order() {
        let labels: Vec<_> = columns_for(EntityKind::Domains)
            .into_iter()
            .map(|c| c.label)
            .take(3)
            .collect();
        assert_eq!(labels, vec!["id", "place", "sponser"]);
    }
}
