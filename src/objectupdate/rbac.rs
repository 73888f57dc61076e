// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use k8s_openapi::api::rbac::v1::{ClusterRoleBinding, Subject};

/// Point every service account subject of `crb` at `sa_name` in `namespace`,
/// adding one when the binding has none.
pub fn cluster_role_binding(crb: &mut ClusterRoleBinding, sa_name: &str, namespace: &str) {
    let subjects = crb.subjects.get_or_insert_with(Vec::new);

    let mut updated = false;
    for subject in subjects.iter_mut().filter(|s| s.kind == "ServiceAccount") {
        subject.name = sa_name.to_string();
        subject.namespace = Some(namespace.to_string());
        updated = true;
    }

    if !updated {
        subjects.push(Subject {
            kind: "ServiceAccount".to_string(),
            name: sa_name.to_string(),
            namespace: Some(namespace.to_string()),
            api_group: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updates_existing_subject() {
        let mut crb = ClusterRoleBinding {
            subjects: Some(vec![Subject {
                kind: "ServiceAccount".to_string(),
                name: "old".to_string(),
                namespace: Some("old-ns".to_string()),
                api_group: None,
            }]),
            ..Default::default()
        };

        cluster_role_binding(&mut crb, "new", "new-ns");

        let subjects = crb.subjects.unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].name, "new");
        assert_eq!(subjects[0].namespace.as_deref(), Some("new-ns"));
    }

    #[test]
    fn test_adds_subject_when_missing() {
        let mut crb = ClusterRoleBinding::default();
        cluster_role_binding(&mut crb, "sa", "ns");
        let subjects = crb.subjects.unwrap();
        assert_eq!(subjects.len(), 1);
        assert_eq!(subjects[0].kind, "ServiceAccount");
    }

    #[test]
    fn test_leaves_group_subjects_alone() {
        let mut crb = ClusterRoleBinding {
            subjects: Some(vec![Subject {
                kind: "Group".to_string(),
                name: "system:masters".to_string(),
                namespace: None,
                api_group: Some("rbac.authorization.k8s.io".to_string()),
            }]),
            ..Default::default()
        };

        cluster_role_binding(&mut crb, "sa", "ns");

        let subjects = crb.subjects.unwrap();
        assert_eq!(subjects.len(), 2);
        assert_eq!(subjects[0].name, "system:masters");
        assert_eq!(subjects[1].name, "sa");
    }
}
