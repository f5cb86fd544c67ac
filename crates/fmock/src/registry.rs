use std::collections::HashMap;

use crate::dispatch::Interception;
use crate::error::MockError;
use crate::policy::ReturnPolicy;
use crate::substitute::Substitute;
use crate::target::{OwnerKey, TargetIdentity};

/// Substitutes and installed interceptions for one active session.
///
/// At most one substitute exists per class or free function; lookups are
/// by exact name.
#[derive(Debug, Default)]
pub struct ReplacementRegistry {
    substitutes: HashMap<OwnerKey, Substitute>,
    /// Intercepted targets, in installation order.
    installed: Vec<TargetIdentity>,
    trace_invocations: bool,
}

impl ReplacementRegistry {
    pub fn new(trace_invocations: bool) -> Self {
        ReplacementRegistry {
            trace_invocations,
            ..ReplacementRegistry::default()
        }
    }

    /// Resolve `raw`, find or create the owning substitute, bind the
    /// target's slot to `policy` and make sure the target is intercepted.
    ///
    /// The first replacement on a class intercepts every method the class
    /// declares, so calls to its unreplaced methods are recorded too and
    /// reach the original through the substitute.
    pub fn replace(
        &mut self,
        interception: &mut dyn Interception,
        raw: &str,
        policy: ReturnPolicy,
    ) -> Result<Substitute, MockError> {
        let target = interception
            .resolve(raw)
            .ok_or_else(|| MockError::InvalidTarget(format!("cannot resolve `{raw}`")))?;

        let trace_invocations = self.trace_invocations;
        let substitute = self
            .substitutes
            .entry(target.owner_key())
            .or_insert_with(|| match &target {
                TargetIdentity::Function { name } => {
                    Substitute::for_function(name, trace_invocations)
                }
                TargetIdentity::Method { class, .. } => {
                    let originals = interception
                        .methods_of(class)
                        .into_iter()
                        .filter_map(|method| {
                            let original =
                                interception.original(&TargetIdentity::method(class, &method))?;
                            Some((method, original))
                        })
                        .collect();
                    Substitute::for_class(class, originals, trace_invocations)
                }
            })
            .clone();

        tracing::debug!(
            target_name = %target,
            policy = policy.kind(),
            "replacing target"
        );
        substitute.bind(target.slot(), policy);

        let routed = match &target {
            TargetIdentity::Function { .. } => vec![target.clone()],
            TargetIdentity::Method { class, .. } => interception
                .methods_of(class)
                .iter()
                .map(|method| TargetIdentity::method(class, method))
                .chain(std::iter::once(target.clone()))
                .collect(),
        };
        for target in routed {
            if !self.installed.contains(&target) {
                interception.install(&target, &substitute)?;
                self.installed.push(target);
            }
        }

        Ok(substitute)
    }

    pub fn len(&self) -> usize {
        self.substitutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutes.is_empty()
    }

    pub fn installed(&self) -> &[TargetIdentity] {
        &self.installed
    }

    /// Restore every intercepted target, most recent first, and drop all
    /// substitutes.
    ///
    /// Policies are released as well, so a callback that captured its own
    /// substitute does not keep it alive past the session.
    pub fn tear_down(self, interception: &mut dyn Interception) {
        for target in self.installed.iter().rev() {
            interception.restore(target);
        }
        for substitute in self.substitutes.values() {
            substitute.release();
        }
        tracing::debug!(
            substitutes = self.substitutes.len(),
            restored = self.installed.len(),
            "registry discarded"
        );
    }
}
