//! Validating certification paths.
//!
//! The validation follows the basic path validation algorithm of RFC 5280,
//! section 6.1. The first certificate of a path is the trust anchor. It
//! only provides the initial working issuer name and public key and its
//! path length constraint. All other certificates are fully processed.

use chrono::{DateTime, Utc};
use log::{info, trace, warn};
use crate::error::Error;
use crate::oid::Oid;
use crate::x509::{
    oid, Certificate, Crypto, CryptoError, KeyUsage, PublicKeyInfo,
};
use crate::x501::Name;
use super::CertificationPath;
use super::policy::PolicyTree;
use super::subtrees::Subtrees;


//------------ PathValidationConfig ------------------------------------------

/// The inputs of path validation.
///
/// The default configuration validates at the current time, doesn’t limit
/// the path length, accepts any policy and doesn’t require explicit
/// policies.
#[derive(Clone, Debug)]
pub struct PathValidationConfig {
    time: Option<DateTime<Utc>>,
    max_path_length: Option<usize>,
    user_initial_policy_set: Vec<Oid>,
    initial_explicit_policy: bool,
    initial_policy_mapping_inhibit: bool,
    initial_any_policy_inhibit: bool,
    trust_anchor: Option<Certificate>,
}

impl Default for PathValidationConfig {
    fn default() -> Self {
        PathValidationConfig {
            time: None,
            max_path_length: None,
            user_initial_policy_set: vec![oid::ANY_POLICY.to_bytes_oid()],
            initial_explicit_policy: false,
            initial_policy_mapping_inhibit: false,
            initial_any_policy_inhibit: false,
            trust_anchor: None,
        }
    }
}

impl PathValidationConfig {
    /// Returns the time to validate at.
    ///
    /// If no time was set, this is the current time.
    pub fn time(&self) -> DateTime<Utc> {
        self.time.unwrap_or_else(Utc::now)
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn max_path_length(&self) -> Option<usize> {
        self.max_path_length
    }

    /// Limits the number of non-self-issued intermediate certificates.
    pub fn with_max_path_length(mut self, len: usize) -> Self {
        self.max_path_length = Some(len);
        self
    }

    pub fn user_initial_policy_set(&self) -> &[Oid] {
        &self.user_initial_policy_set
    }

    pub fn with_user_initial_policy_set(mut self, policies: Vec<Oid>) -> Self {
        self.user_initial_policy_set = policies;
        self
    }

    pub fn initial_explicit_policy(&self) -> bool {
        self.initial_explicit_policy
    }

    pub fn with_initial_explicit_policy(mut self, value: bool) -> Self {
        self.initial_explicit_policy = value;
        self
    }

    pub fn initial_policy_mapping_inhibit(&self) -> bool {
        self.initial_policy_mapping_inhibit
    }

    pub fn with_initial_policy_mapping_inhibit(mut self, value: bool) -> Self {
        self.initial_policy_mapping_inhibit = value;
        self
    }

    pub fn initial_any_policy_inhibit(&self) -> bool {
        self.initial_any_policy_inhibit
    }

    pub fn with_initial_any_policy_inhibit(mut self, value: bool) -> Self {
        self.initial_any_policy_inhibit = value;
        self
    }

    pub fn trust_anchor(&self) -> Option<&Certificate> {
        self.trust_anchor.as_ref()
    }

    /// Requires the path to start at the given certificate.
    pub fn with_trust_anchor(mut self, anchor: Certificate) -> Self {
        self.trust_anchor = Some(anchor);
        self
    }
}


//------------ PathValidator -------------------------------------------------

/// Validates a single certification path.
pub struct PathValidator<'a> {
    crypto: &'a dyn Crypto,
    path: &'a CertificationPath,
    config: PathValidationConfig,
}

impl<'a> PathValidator<'a> {
    pub fn new(
        crypto: &'a dyn Crypto,
        path: &'a CertificationPath,
        config: PathValidationConfig,
    ) -> Self {
        PathValidator { crypto, path, config }
    }

    pub fn path(&self) -> &CertificationPath {
        self.path
    }

    pub fn config(&self) -> &PathValidationConfig {
        &self.config
    }

    /// Validates the path.
    ///
    /// Processing stops at the first problem found.
    pub fn validate(&self) -> Result<PathValidationResult, ValidationError> {
        match self.process() {
            Ok(res) => {
                info!(
                    "validated path of {} certificates for {}",
                    self.path.len(), res.certificate.subject()
                );
                Ok(res)
            }
            Err(err) => {
                warn!("path validation failed: {}", err);
                Err(err)
            }
        }
    }

    fn process(&self) -> Result<PathValidationResult, ValidationError> {
        let certs = self.path.certificates();
        let anchor = certs.first().ok_or(ValidationError::EmptyPath)?;
        if let Some(required) = self.config.trust_anchor.as_ref() {
            if required.tbs_der() != anchor.tbs_der() {
                return Err(ValidationError::UntrustedAnchor)
            }
        }
        let time = self.config.time();
        trace!("checking trust anchor {}", anchor.subject());
        if !anchor.validity().contains(time) {
            return Err(ValidationError::ExpiredOrNotYetValid { index: 0 })
        }

        let mut state = ValidatorState::new(anchor, certs.len() - 1, &self.config);
        for (index, cert) in certs.iter().enumerate().skip(1) {
            trace!("processing certificate {} ({})", index, cert.subject());
            state.process_certificate(self.crypto, index, cert, time)?;
            if index < state.n {
                state.prepare_next(index, cert)?;
            }
        }
        let target = certs.last().ok_or(ValidationError::EmptyPath)?;
        state.wrap_up(target, &self.config)
    }
}


//------------ ValidatorState ------------------------------------------------

/// The state variables of RFC 5280, section 6.1.2.
#[derive(Clone, Debug)]
struct ValidatorState {
    /// The number of certificates after the trust anchor.
    n: usize,

    policy_tree: Option<PolicyTree>,
    subtrees: Subtrees,
    explicit_policy: usize,
    inhibit_any_policy: usize,
    policy_mapping: usize,
    working_public_key: PublicKeyInfo,
    working_issuer_name: Name,
    max_path_length: usize,
}

impl ValidatorState {
    fn new(
        anchor: &Certificate, n: usize, config: &PathValidationConfig
    ) -> Self {
        let initial = |inhibit: bool| if inhibit { 0 } else { n + 1 };
        let mut max_path_length = match config.max_path_length {
            Some(max) => max.min(n),
            None => n
        };
        if let Some(len) = anchor.extensions().basic_constraints().and_then(
            |bc| bc.path_len_constraint
        ) {
            max_path_length = max_path_length.min(len as usize)
        }
        ValidatorState {
            n,
            policy_tree: Some(PolicyTree::new()),
            subtrees: Subtrees::default(),
            explicit_policy: initial(config.initial_explicit_policy),
            inhibit_any_policy: initial(config.initial_any_policy_inhibit),
            policy_mapping: initial(config.initial_policy_mapping_inhibit),
            working_public_key: anchor.subject_public_key_info().clone(),
            working_issuer_name: anchor.subject().clone(),
            max_path_length,
        }
    }

    /// Basic certificate processing.
    fn process_certificate(
        &mut self,
        crypto: &dyn Crypto,
        index: usize,
        cert: &Certificate,
        time: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        match cert.verify_signature(crypto, &self.working_public_key) {
            Ok(true) => { }
            Ok(false) => {
                return Err(ValidationError::SignatureVerification { index })
            }
            Err(Error::Crypto(err)) => return Err(err.into()),
            Err(_) => {
                return Err(ValidationError::SignatureVerification { index })
            }
        }
        if !cert.validity().contains(time) {
            return Err(ValidationError::ExpiredOrNotYetValid { index })
        }
        if *cert.issuer() != self.working_issuer_name {
            return Err(ValidationError::IssuerMismatch { index })
        }

        if !cert.is_self_issued() || index == self.n {
            self.subtrees.check_certificate(cert).map_err(|reason| {
                ValidationError::NameConstraintViolation { index, reason }
            })?;
        }

        self.process_policies(index, cert);
        if self.explicit_policy == 0 && self.policy_tree.is_none() {
            return Err(ValidationError::PolicyValidation(format!(
                "no valid policy for certificate {}", index
            )))
        }
        Ok(())
    }

    /// Updates the policy tree with the certificate’s policies.
    fn process_policies(&mut self, index: usize, cert: &Certificate) {
        let any_allowed = self.inhibit_any_policy > 0
            || (index < self.n && cert.is_self_issued());
        let policies = match cert.extensions().certificate_policies() {
            Some(policies) => policies,
            None => {
                trace!("no certificate policies, clearing policy tree");
                self.policy_tree = None;
                return
            }
        };
        let tree = match self.policy_tree.as_mut() {
            Some(tree) => tree,
            None => return
        };
        let parents = tree.indexes_at_depth(index - 1);

        for info in policies.iter().filter(|info| !info.is_any_policy()) {
            let policy = &info.policy_identifier;
            let mut matched = false;
            for &parent in &parents {
                let expected = tree.node(parent).map(|node| {
                    node.expected_policy_set().contains(policy)
                }).unwrap_or(false);
                if expected {
                    tree.add_child(
                        parent, policy.clone(), info.qualifiers.clone(),
                        vec![policy.clone()]
                    );
                    matched = true;
                }
            }
            if !matched {
                for &parent in &parents {
                    let any = tree.node(parent).map(|node| {
                        node.is_any_policy()
                    }).unwrap_or(false);
                    if any {
                        tree.add_child(
                            parent, policy.clone(), info.qualifiers.clone(),
                            vec![policy.clone()]
                        );
                    }
                }
            }
        }

        if any_allowed {
            if let Some(any) = policies.iter().find(|info| info.is_any_policy()) {
                for &parent in &parents {
                    let expected = match tree.node(parent) {
                        Some(node) => node.expected_policy_set().to_vec(),
                        None => continue
                    };
                    for policy in expected {
                        if !tree.has_child_with_policy(parent, &policy) {
                            tree.add_child(
                                parent, policy.clone(),
                                any.qualifiers.clone(), vec![policy]
                            );
                        }
                    }
                }
            }
        }

        tree.prune(index);
        if tree.is_empty() {
            trace!("policy tree became empty at certificate {}", index);
            self.policy_tree = None;
        }
    }

    /// Prepares for the next certificate after an intermediate.
    fn prepare_next(
        &mut self, index: usize, cert: &Certificate
    ) -> Result<(), ValidationError> {
        self.process_mappings(index, cert)?;

        self.working_issuer_name = cert.subject().clone();
        self.working_public_key = cert.subject_public_key_info().clone();

        if let Some(constraints) = cert.extensions().name_constraints() {
            self.subtrees.update(constraints);
        }

        let self_issued = cert.is_self_issued();
        if !self_issued {
            self.explicit_policy = self.explicit_policy.saturating_sub(1);
            self.policy_mapping = self.policy_mapping.saturating_sub(1);
            self.inhibit_any_policy = self.inhibit_any_policy.saturating_sub(1);
        }
        if let Some(constraints) = cert.extensions().policy_constraints() {
            if let Some(skip) = constraints.require_explicit_policy {
                self.explicit_policy = self.explicit_policy.min(skip as usize);
            }
            if let Some(skip) = constraints.inhibit_policy_mapping {
                self.policy_mapping = self.policy_mapping.min(skip as usize);
            }
        }
        if let Some(inhibit) = cert.extensions().inhibit_any_policy() {
            self.inhibit_any_policy = self.inhibit_any_policy.min(
                inhibit.0 as usize
            );
        }

        let invalid = |reason: &str| ValidationError::InvalidCaConstraints {
            index, reason: reason.into()
        };
        let constraints = match cert.extensions().basic_constraints() {
            Some(constraints) if constraints.ca => constraints,
            _ => return Err(invalid("certificate is not a CA"))
        };
        if !self_issued {
            if self.max_path_length == 0 {
                return Err(invalid("maximum path length exceeded"))
            }
            self.max_path_length -= 1;
        }
        if let Some(len) = constraints.path_len_constraint {
            self.max_path_length = self.max_path_length.min(len as usize);
        }
        if let Some(usage) = cert.extensions().key_usage() {
            if !usage.contains(KeyUsage::KEY_CERT_SIGN) {
                return Err(invalid("keyCertSign not set in key usage"))
            }
        }

        check_critical_extensions(index, cert)
    }

    /// Processes the policy mappings of an intermediate certificate.
    fn process_mappings(
        &mut self, index: usize, cert: &Certificate
    ) -> Result<(), ValidationError> {
        let mappings = match cert.extensions().policy_mappings() {
            Some(mappings) => mappings,
            None => return Ok(())
        };
        if mappings.iter().any(|mapping| {
            mapping.issuer_domain_policy == oid::ANY_POLICY
                || mapping.subject_domain_policy == oid::ANY_POLICY
        }) {
            return Err(ValidationError::PolicyValidation(format!(
                "anyPolicy mapped in certificate {}", index
            )))
        }
        let tree = match self.policy_tree.as_mut() {
            Some(tree) => tree,
            None => return Ok(())
        };

        let mut issuer_policies: Vec<&Oid> = Vec::new();
        for mapping in mappings.iter() {
            if !issuer_policies.contains(&&mapping.issuer_domain_policy) {
                issuer_policies.push(&mapping.issuer_domain_policy)
            }
        }

        let nodes = tree.indexes_at_depth(index);
        for policy in issuer_policies {
            let mapped: Vec<Oid> = mappings.mapped_to(policy).cloned().collect();
            let matching: Vec<usize> = nodes.iter().copied().filter(|&idx| {
                tree.node(idx).map(|node| {
                    node.valid_policy() == policy
                }).unwrap_or(false)
            }).collect();

            if self.policy_mapping > 0 {
                if !matching.is_empty() {
                    for idx in matching {
                        tree.set_expected_policy_set(idx, mapped.clone());
                    }
                    continue
                }
                let any = nodes.iter().copied().find_map(|idx| {
                    let node = tree.node(idx)?;
                    if node.is_any_policy() {
                        Some((node.parent()?, node.qualifiers().to_vec()))
                    }
                    else {
                        None
                    }
                });
                if let Some((parent, qualifiers)) = any {
                    tree.add_child(
                        parent, policy.clone(), qualifiers, mapped
                    );
                }
            }
            else {
                for idx in matching {
                    tree.remove(idx)
                }
            }
        }

        tree.prune(index);
        if tree.is_empty() {
            self.policy_tree = None;
        }
        Ok(())
    }

    /// The wrap-up procedure for the target certificate.
    fn wrap_up(
        mut self, target: &Certificate, config: &PathValidationConfig,
    ) -> Result<PathValidationResult, ValidationError> {
        if self.n > 0 {
            self.explicit_policy = self.explicit_policy.saturating_sub(1);
            let required = target.extensions().policy_constraints().and_then(
                |constraints| constraints.require_explicit_policy
            );
            if required == Some(0) {
                self.explicit_policy = 0
            }
            self.working_public_key = target.subject_public_key_info().clone();
            check_critical_extensions(self.n, target)?;
        }

        let n = self.n;
        let user_set = config.user_initial_policy_set();
        if !user_set.iter().any(|policy| *policy == oid::ANY_POLICY) {
            if let Some(tree) = self.policy_tree.as_mut() {
                intersect_user_policies(tree, n, user_set);
                if tree.is_empty() {
                    self.policy_tree = None;
                }
            }
        }
        if self.explicit_policy == 0 && self.policy_tree.is_none() {
            return Err(ValidationError::PolicyValidation(
                "explicit policy required but no valid policy".into()
            ))
        }

        let policies = match self.policy_tree.as_ref() {
            Some(tree) => tree.policies_at_depth(n).map(|node| {
                node.valid_policy().clone()
            }).collect(),
            None => Vec::new()
        };
        Ok(PathValidationResult {
            certificate: target.clone(),
            policies,
            public_key_info: self.working_public_key,
            policy_tree: self.policy_tree,
        })
    }
}

/// Intersects the policy tree with the user initial policy set.
///
/// The set must not contain anyPolicy.
fn intersect_user_policies(tree: &mut PolicyTree, n: usize, user_set: &[Oid]) {
    // The valid policy node set: nodes whose parent is anyPolicy.
    let node_set: Vec<usize> = (1..=n).flat_map(|depth| {
        tree.indexes_at_depth(depth)
    }).filter(|&idx| {
        tree.node(idx).and_then(|node| node.parent()).and_then(|parent| {
            tree.node(parent)
        }).map(|parent| parent.is_any_policy()).unwrap_or(false)
    }).collect();

    let mut present = Vec::new();
    for idx in node_set {
        let policy = match tree.node(idx) {
            Some(node) if !node.is_any_policy() => node.valid_policy().clone(),
            _ => continue
        };
        if user_set.contains(&policy) {
            present.push(policy)
        }
        else {
            tree.remove(idx)
        }
    }

    let any = tree.indexes_at_depth(n).into_iter().find(|&idx| {
        tree.node(idx).map(|node| node.is_any_policy()).unwrap_or(false)
    });
    let any = any.and_then(|any| {
        let node = tree.node(any)?;
        Some((any, node.parent()?, node.qualifiers().to_vec()))
    });
    if let Some((any, parent, qualifiers)) = any {
        for policy in user_set {
            if !present.contains(policy) {
                tree.add_child(
                    parent, policy.clone(), qualifiers.clone(),
                    vec![policy.clone()]
                );
            }
        }
        tree.remove(any);
    }
    tree.prune(n);
}

/// Fails if the certificate has critical extensions we don’t understand.
fn check_critical_extensions(
    index: usize, cert: &Certificate
) -> Result<(), ValidationError> {
    match cert.extensions().unknown_critical().next() {
        Some(ext) => {
            Err(ValidationError::UnknownCriticalExtension {
                index, oid: ext.id()
            })
        }
        None => Ok(())
    }
}


//------------ PathValidationResult ------------------------------------------

/// The outcome of a successful path validation.
#[derive(Clone, Debug)]
pub struct PathValidationResult {
    certificate: Certificate,
    policies: Vec<Oid>,
    public_key_info: PublicKeyInfo,
    policy_tree: Option<PolicyTree>,
}

impl PathValidationResult {
    /// Returns the target certificate.
    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// Returns the valid policies at the depth of the target.
    pub fn policies(&self) -> &[Oid] {
        &self.policies
    }

    /// Returns the public key of the target certificate.
    pub fn public_key_info(&self) -> &PublicKeyInfo {
        &self.public_key_info
    }

    /// Returns the final policy tree.
    ///
    /// Returns `None` if the tree became NULL.
    pub fn policy_tree(&self) -> Option<&PolicyTree> {
        self.policy_tree.as_ref()
    }
}


//------------ ValidationError -----------------------------------------------

/// A certification path failed validation.
///
/// Indexes refer to the position of the offending certificate in the path
/// with the trust anchor at index 0.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid signature on certificate {index}")]
    SignatureVerification { index: usize },

    #[error("certificate {index} is expired or not yet valid")]
    ExpiredOrNotYetValid { index: usize },

    #[error("name constraint violation in certificate {index}: {reason}")]
    NameConstraintViolation { index: usize, reason: String },

    #[error("policy validation failed: {0}")]
    PolicyValidation(String),

    #[error("invalid CA certificate {index}: {reason}")]
    InvalidCaConstraints { index: usize, reason: String },

    #[error("unknown critical extension {oid} in certificate {index}")]
    UnknownCriticalExtension { index: usize, oid: Oid },

    #[error("issuer of certificate {index} doesn’t match previous subject")]
    IssuerMismatch { index: usize },

    #[error("empty certification path")]
    EmptyPath,

    #[error("path doesn’t start at the required trust anchor")]
    UntrustedAnchor,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}


//============ Tests =========================================================

#[cfg(all(test, feature = "ed25519"))]
mod test {
    use chrono::TimeZone;
    use crate::x509::{
        BasicConstraints, CertificatePolicies, Ed25519Crypto, Extension,
        GeneralName, GeneralSubtree, NameConstraints, PolicyConstraints,
        PolicyInformation, PolicyMapping, PolicyMappings, Time, Validity,
    };
    use crate::path::testing::{ca, ee, make, self_signed, validity};
    use super::*;

    fn oid(s: &str) -> Oid {
        s.parse().unwrap()
    }

    fn policies(items: &[&str]) -> Extension {
        Extension::new(false, CertificatePolicies::new(
            items.iter().map(|s| PolicyInformation::new(oid(s))).collect()
        ))
    }

    fn ca_with(
        subject: &str, seed: u8, issuer: &str, issuer_seed: u8,
        mut extensions: Vec<Extension>,
    ) -> Certificate {
        extensions.push(Extension::new(true, BasicConstraints::ca(None)));
        make(subject, seed, issuer, issuer_seed, validity(), extensions)
    }

    fn validate(
        certs: Vec<Certificate>, config: PathValidationConfig
    ) -> Result<PathValidationResult, ValidationError> {
        let path = CertificationPath::new(certs);
        PathValidator::new(&Ed25519Crypto::new(), &path, config).validate()
    }

    #[test]
    fn simple_path() {
        let root = self_signed("cn=Root", 1);
        let inter = ca("cn=Inter", 2, "cn=Root", 1);
        let leaf = ee("cn=Leaf", 3, "cn=Inter", 2);
        let res = validate(
            vec![root.clone(), inter, leaf.clone()], Default::default()
        ).unwrap();
        assert_eq!(res.certificate(), &leaf);
        assert_eq!(res.public_key_info(), leaf.subject_public_key_info());

        // No policies anywhere, so the tree is NULL.
        assert!(res.policy_tree().is_none());
        assert!(res.policies().is_empty());

        let res = validate(vec![root.clone()], Default::default()).unwrap();
        assert_eq!(res.certificate(), &root);
        assert_eq!(res.policies(), &[oid::ANY_POLICY.to_bytes_oid()]);
    }

    #[test]
    fn basic_failures() {
        let root = self_signed("cn=Root", 1);
        let other = self_signed("cn=Other", 9);
        let inter = ca("cn=Inter", 2, "cn=Root", 1);
        let leaf = ee("cn=Leaf", 3, "cn=Inter", 2);
        let forged = ee("cn=Leaf", 3, "cn=Inter", 7);

        assert_eq!(
            validate(Vec::new(), Default::default()).unwrap_err(),
            ValidationError::EmptyPath
        );
        assert_eq!(
            validate(
                vec![root.clone(), inter.clone(), forged], Default::default()
            ).unwrap_err(),
            ValidationError::SignatureVerification { index: 2 }
        );
        assert_eq!(
            validate(
                vec![other.clone(), inter.clone()], Default::default()
            ).unwrap_err(),
            ValidationError::SignatureVerification { index: 1 }
        );
        assert_eq!(
            validate(
                vec![root.clone(), leaf.clone()], Default::default()
            ).unwrap_err(),
            ValidationError::SignatureVerification { index: 1 }
        );
        assert_eq!(
            validate(
                vec![root.clone(), inter.clone(), leaf.clone()],
                PathValidationConfig::default().with_trust_anchor(other)
            ).unwrap_err(),
            ValidationError::UntrustedAnchor
        );
        assert_eq!(
            validate(
                vec![root, inter, leaf],
                PathValidationConfig::default().with_time(
                    Utc.with_ymd_and_hms(2070, 1, 1, 0, 0, 0).unwrap()
                )
            ).unwrap_err(),
            ValidationError::ExpiredOrNotYetValid { index: 0 }
        );
    }

    #[test]
    fn issuer_mismatch() {
        let root = self_signed("cn=Root", 1);
        // Signed by the root’s key but naming another issuer.
        let leaf = ee("cn=Leaf", 3, "cn=Elsewhere", 1);
        assert_eq!(
            validate(vec![root, leaf], Default::default()).unwrap_err(),
            ValidationError::IssuerMismatch { index: 1 }
        );
    }

    #[test]
    fn ca_constraints() {
        let root = self_signed("cn=Root", 1);
        let not_ca = ee("cn=Inter", 2, "cn=Root", 1);
        let leaf = ee("cn=Leaf", 3, "cn=Inter", 2);
        assert!(matches!(
            validate(
                vec![root.clone(), not_ca, leaf.clone()], Default::default()
            ).unwrap_err(),
            ValidationError::InvalidCaConstraints { index: 1, .. }
        ));

        let limited = make(
            "cn=Inter", 2, "cn=Root", 1, validity(),
            vec![Extension::new(true, BasicConstraints::ca(Some(0)))]
        );
        let inter2 = ca("cn=Inter2", 4, "cn=Inter", 2);
        let leaf2 = ee("cn=Leaf", 3, "cn=Inter2", 4);
        assert!(validate(
            vec![root.clone(), limited.clone(), leaf.clone()],
            Default::default()
        ).is_ok());
        assert!(matches!(
            validate(
                vec![root.clone(), limited, inter2.clone(), leaf2.clone()],
                Default::default()
            ).unwrap_err(),
            ValidationError::InvalidCaConstraints { index: 2, .. }
        ));

        let inter = ca("cn=Inter", 2, "cn=Root", 1);
        assert!(matches!(
            validate(
                vec![root.clone(), inter, inter2, leaf2],
                PathValidationConfig::default().with_max_path_length(1)
            ).unwrap_err(),
            ValidationError::InvalidCaConstraints { index: 2, .. }
        ));

        let no_sign = make(
            "cn=Inter", 2, "cn=Root", 1, validity(),
            vec![
                Extension::new(true, BasicConstraints::ca(None)),
                Extension::new(true, KeyUsage::CRL_SIGN),
            ]
        );
        assert!(matches!(
            validate(vec![root, no_sign, leaf], Default::default()).unwrap_err(),
            ValidationError::InvalidCaConstraints { index: 1, .. }
        ));
    }

    #[test]
    fn expired_leaf() {
        let root = self_signed("cn=Root", 1);
        let leaf = make(
            "cn=Leaf", 3, "cn=Root", 1,
            Validity::new(
                Time::new(Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()),
                Time::new(Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()),
            ),
            Vec::new()
        );
        assert_eq!(
            validate(vec![root, leaf], Default::default()).unwrap_err(),
            ValidationError::ExpiredOrNotYetValid { index: 1 }
        );
    }

    #[test]
    fn unknown_critical() {
        use crate::string::OctetString;
        use crate::x509::ExtensionValue;

        let root = self_signed("cn=Root", 1);
        let ext = Extension::new(true, ExtensionValue::Unknown {
            id: oid("1.2.3.4"),
            value: OctetString::new(bytes::Bytes::from_static(b"\x05\x00")),
        });
        let leaf = make(
            "cn=Leaf", 3, "cn=Root", 1, validity(), vec![ext]
        );
        assert_eq!(
            validate(vec![root, leaf], Default::default()).unwrap_err(),
            ValidationError::UnknownCriticalExtension {
                index: 1, oid: oid("1.2.3.4")
            }
        );
    }

    #[test]
    fn name_constraints() {
        let root = self_signed("cn=Root", 1);
        let inter = ca_with("cn=Inter", 2, "cn=Root", 1, vec![
            Extension::new(true, NameConstraints {
                permitted: Some(vec![GeneralSubtree::new(
                    GeneralName::DirectoryName("c=DE".parse().unwrap())
                )]),
                excluded: None,
            })
        ]);
        let good = ee("cn=Leaf,c=DE", 3, "cn=Inter", 2);
        let bad = ee("cn=Leaf,c=NL", 3, "cn=Inter", 2);
        assert!(validate(
            vec![root.clone(), inter.clone(), good], Default::default()
        ).is_ok());
        assert!(matches!(
            validate(vec![root, inter, bad], Default::default()).unwrap_err(),
            ValidationError::NameConstraintViolation { index: 2, .. }
        ));
    }

    #[test]
    fn policies_and_mappings() {
        let root = self_signed("cn=Root", 1);
        let inter = ca_with("cn=Inter", 2, "cn=Root", 1, vec![
            policies(&["1.2.3", "1.2.4"]),
        ]);
        let leaf = make("cn=Leaf", 3, "cn=Inter", 2, validity(), vec![
            policies(&["1.2.3"]),
        ]);
        let res = validate(
            vec![root.clone(), inter.clone(), leaf.clone()],
            Default::default()
        ).unwrap();
        assert_eq!(res.policies(), &[oid("1.2.3")]);

        let res = validate(
            vec![root.clone(), inter.clone(), leaf.clone()],
            PathValidationConfig::default()
                .with_initial_explicit_policy(true)
                .with_user_initial_policy_set(vec![oid("1.2.3")])
        ).unwrap();
        assert_eq!(res.policies(), &[oid("1.2.3")]);

        assert!(matches!(
            validate(
                vec![root.clone(), inter.clone(), leaf.clone()],
                PathValidationConfig::default()
                    .with_initial_explicit_policy(true)
                    .with_user_initial_policy_set(vec![oid("1.2.4")])
            ).unwrap_err(),
            ValidationError::PolicyValidation(_)
        ));

        // Mapping 1.2.3 in the issuer domain to 1.9.9 in the subject domain.
        let mapping = ca_with("cn=Inter", 2, "cn=Root", 1, vec![
            policies(&["1.2.3"]),
            Extension::new(false, PolicyMappings::new(vec![PolicyMapping {
                issuer_domain_policy: oid("1.2.3"),
                subject_domain_policy: oid("1.9.9"),
            }])),
            Extension::new(true, PolicyConstraints {
                require_explicit_policy: Some(0),
                inhibit_policy_mapping: None,
            }),
        ]);
        let mapped_leaf = make("cn=Leaf", 3, "cn=Inter", 2, validity(), vec![
            policies(&["1.9.9"]),
        ]);
        let res = validate(
            vec![root.clone(), mapping.clone(), mapped_leaf.clone()],
            Default::default()
        ).unwrap();
        assert_eq!(res.policies(), &[oid("1.9.9")]);
        let tree = res.policy_tree().unwrap();
        assert_eq!(
            tree.policies_at_depth(1).map(|node| node.valid_policy().clone())
                .collect::<Vec<_>>(),
            vec![oid("1.2.3")]
        );
        assert_eq!(
            validate(
                vec![root.clone(), mapping.clone(), leaf.clone()],
                Default::default()
            ).unwrap_err(),
            ValidationError::PolicyValidation(
                "no valid policy for certificate 2".into()
            )
        );

        // With mapping inhibited the mapped policy is dropped.
        assert!(matches!(
            validate(
                vec![root.clone(), mapping, mapped_leaf],
                PathValidationConfig::default()
                    .with_initial_policy_mapping_inhibit(true)
            ).unwrap_err(),
            ValidationError::PolicyValidation(_)
        ));

        let any_mapping = ca_with("cn=Inter", 2, "cn=Root", 1, vec![
            policies(&["1.2.3"]),
            Extension::new(false, PolicyMappings::new(vec![PolicyMapping {
                issuer_domain_policy: oid::ANY_POLICY.to_bytes_oid(),
                subject_domain_policy: oid("1.9.9"),
            }])),
        ]);
        assert!(matches!(
            validate(vec![root, any_mapping, leaf], Default::default()).unwrap_err(),
            ValidationError::PolicyValidation(_)
        ));
    }

    #[test]
    fn any_policy() {
        let root = self_signed("cn=Root", 1);
        let inter = ca_with("cn=Inter", 2, "cn=Root", 1, vec![
            policies(&["2.5.29.32.0"]),
        ]);
        let leaf = make("cn=Leaf", 3, "cn=Inter", 2, validity(), vec![
            policies(&["1.2.3"]),
        ]);
        let res = validate(
            vec![root.clone(), inter.clone(), leaf.clone()],
            Default::default()
        ).unwrap();
        assert_eq!(res.policies(), &[oid("1.2.3")]);

        // If anyPolicy is inhibited, the intermediate contributes nothing.
        assert!(matches!(
            validate(
                vec![root, inter, leaf],
                PathValidationConfig::default()
                    .with_initial_any_policy_inhibit(true)
                    .with_initial_explicit_policy(true)
            ).unwrap_err(),
            ValidationError::PolicyValidation(_)
        ));
    }
}
