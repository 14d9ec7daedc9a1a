//! Finding certification paths.

use std::collections::HashSet;
use bytes::Bytes;
use log::debug;
use crate::x509::Certificate;
use super::{CertificateBundle, CertificationPath};


//------------ PathBuilder ---------------------------------------------------

/// Finds certification paths from trust anchors to a target certificate.
///
/// Issuers are found by comparing names and key identifiers only. The
/// paths found still need to be validated via a
/// [`PathValidator`][super::PathValidator].
///
/// Paths always end at a trust anchor. Intermediate certificates are
/// never used as the start of a path even if they are self-signed. Every
/// certificate is used at most once per path which prevents cycles.
#[derive(Clone, Debug, Default)]
pub struct PathBuilder {
    trust_anchors: CertificateBundle,
    intermediates: CertificateBundle,
}

impl PathBuilder {
    pub fn new(
        trust_anchors: CertificateBundle,
        intermediates: CertificateBundle,
    ) -> Self {
        PathBuilder { trust_anchors, intermediates }
    }

    pub fn trust_anchors(&self) -> &CertificateBundle {
        &self.trust_anchors
    }

    pub fn intermediates(&self) -> &CertificateBundle {
        &self.intermediates
    }

    /// Returns all paths from a trust anchor to `target`.
    ///
    /// If the target itself is a self-issued trust anchor, the result
    /// contains the path consisting only of the target.
    pub fn all_paths_to_target(
        &self, target: &Certificate
    ) -> Vec<CertificationPath> {
        let mut res = Vec::new();
        if target.is_self_issued() && self.trust_anchors.contains(target) {
            debug!("target {} is a trust anchor", target.subject());
            res.push(CertificationPath::new(vec![target.clone()]));
            return res
        }
        let mut chain = vec![target.clone()];
        let mut visited = HashSet::new();
        visited.insert(target.tbs_der().clone());
        self.extend_paths(&mut chain, &mut visited, &mut res);
        debug!(
            "found {} paths for target {}", res.len(), target.subject()
        );
        res
    }

    /// Returns the shortest path from a trust anchor to `target`.
    ///
    /// If there are several shortest paths, the first one found is
    /// returned.
    pub fn shortest_path_to_target(
        &self, target: &Certificate
    ) -> Result<CertificationPath, PathBuildingError> {
        self.all_paths_to_target(target).into_iter().min_by_key(|path| {
            path.len()
        }).ok_or_else(|| PathBuildingError::new(target))
    }

    /// Finds all paths that continue `chain`.
    ///
    /// The chain is ordered from the target towards the anchor. The
    /// `visited` set contains the signed content of all certificates in
    /// the chain.
    fn extend_paths(
        &self,
        chain: &mut Vec<Certificate>,
        visited: &mut HashSet<Bytes>,
        res: &mut Vec<CertificationPath>,
    ) {
        let current = match chain.last() {
            Some(current) => current.clone(),
            None => return
        };
        for anchor in self.trust_anchors.issuers_of(&current) {
            if visited.contains(anchor.tbs_der()) {
                continue
            }
            debug!("trust anchor {} issued {}", anchor.subject(), current.subject());
            res.push(CertificationPath::new(
                Some(anchor.clone()).into_iter()
                    .chain(chain.iter().rev().cloned())
                    .collect()
            ));
        }
        for issuer in self.intermediates.issuers_of(&current) {
            if visited.contains(issuer.tbs_der()) {
                debug!(
                    "skipping {} already on the path", issuer.subject()
                );
                continue
            }
            if self.trust_anchors.contains(issuer) {
                continue
            }
            debug!(
                "trying intermediate {} for {}",
                issuer.subject(), current.subject()
            );
            visited.insert(issuer.tbs_der().clone());
            chain.push(issuer.clone());
            self.extend_paths(chain, visited, res);
            chain.pop();
            visited.remove(issuer.tbs_der());
        }
    }
}


//------------ PathBuildingError ---------------------------------------------

/// No certification path could be found.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("no certification path found for {subject}")]
pub struct PathBuildingError {
    subject: String,
}

impl PathBuildingError {
    fn new(target: &Certificate) -> Self {
        PathBuildingError { subject: target.subject().to_string() }
    }

    /// Returns the subject of the target certificate.
    pub fn subject(&self) -> &str {
        &self.subject
    }
}


//============ Tests =========================================================

#[cfg(all(test, feature = "ed25519"))]
mod test {
    use crate::path::testing::{ca, ee, self_signed};
    use super::*;

    #[test]
    fn self_signed_anchor() {
        let root = self_signed("cn=Root", 1);
        let builder = PathBuilder::new(
            vec![root.clone()].into(), CertificateBundle::new()
        );
        let paths = builder.all_paths_to_target(&root);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].len(), 1);
    }

    #[test]
    fn paths() {
        let root = self_signed("cn=Root", 1);
        let inter = ca("cn=Inter", 2, "cn=Root", 1);
        let leaf = ee("cn=Leaf", 3, "cn=Inter", 2);
        let direct = ee("cn=Leaf", 3, "cn=Root", 1);

        let builder = PathBuilder::new(
            vec![root.clone()].into(), vec![inter.clone()].into()
        );
        let paths = builder.all_paths_to_target(&leaf);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].certificates(), &[root.clone(), inter, leaf][..]);

        let path = builder.shortest_path_to_target(&direct).unwrap();
        assert_eq!(path.certificates(), &[root, direct][..]);
    }

    #[test]
    fn no_path() {
        let root = self_signed("cn=Root", 1);
        let leaf = ee("cn=Leaf", 3, "cn=Other", 4);
        let builder = PathBuilder::new(
            vec![root].into(), CertificateBundle::new()
        );
        let err = builder.shortest_path_to_target(&leaf).unwrap_err();
        assert_eq!(err.subject(), "cn=Leaf");
    }

    #[test]
    fn cycles() {
        let root = self_signed("cn=Root", 1);
        let a = ca("cn=A", 2, "cn=B", 3);
        let b = ca("cn=B", 3, "cn=A", 2);
        let a_root = ca("cn=A", 2, "cn=Root", 1);
        let leaf = ee("cn=Leaf", 4, "cn=A", 2);

        let builder = PathBuilder::new(
            vec![root.clone()].into(), vec![a.clone(), b].into()
        );
        assert!(builder.all_paths_to_target(&leaf).is_empty());

        let builder = PathBuilder::new(
            vec![root].into(), vec![a, a_root.clone()].into()
        );
        let paths = builder.all_paths_to_target(&leaf);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].certificates()[1], a_root);
    }
}
