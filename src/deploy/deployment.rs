// ABOUTME: Generic deployment struct parameterized by state.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::types::BundleName;

use super::state::{Idle, Installed, Started};
use super::target::DeploymentTarget;

/// A deployment in progress, parameterized by its current state.
///
/// Transitions consume the deployment and return the next state, so a step
/// can neither be repeated nor run out of order.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) target: DeploymentTarget,
    pub(crate) state: S,
}

impl Deployment<Idle> {
    pub fn new(target: DeploymentTarget) -> Self {
        Deployment {
            target,
            state: Idle,
        }
    }
}

impl<S> Deployment<S> {
    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    pub fn bundle(&self) -> &BundleName {
        &self.target.bundle
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl Deployment<Installed> {
    /// Id the console assigned to the new bundle.
    pub fn installed_id(&self) -> &crate::types::BundleId {
        self.state.id()
    }
}

impl Deployment<Started> {
    /// Id of the running bundle.
    pub fn started_id(&self) -> &crate::types::BundleId {
        self.state.id()
    }
}
