/*!
The variable manager (C5): creates and indexes one boolean decision per
authorized `(step, user)` pair.

Variables are dense `u32` indices rather than a richer handle type — there
is exactly one array of them, created once per solve and never resized,
so a plain index is enough and keeps [step_vars](VariableManager::step_vars)
and [user_vars](VariableManager::user_vars) simple slice views rather than
maps.
*/

use crate::instance::{Instance, Step, User};
use crate::types::err::InternalError;

/// A boolean decision variable `x[s,u]`, valid only for an authorized pair.
pub type Var = u32;

/// Indexes the authorized `(step, user)` pairs of an [Instance] as dense
/// variables.
///
/// Holds a reference to the instance it was built from rather than copying
/// the authorization matrix — the manager adds no state the instance
/// doesn't already expose, only a different indexing of it.
pub struct VariableManager<'i> {
    instance: &'i Instance,
    var_of: Vec<Vec<Option<Var>>>,
    step_vars: Vec<Vec<(User, Var)>>,
    user_vars: Vec<Vec<(Step, Var)>>,
    count: usize,
}

impl<'i> VariableManager<'i> {
    /// Creates one variable per authorized `(step, user)` pair of
    /// `instance`, indexed both by step and by user.
    pub fn create(instance: &'i Instance) -> Self {
        let num_steps = instance.num_steps();
        let num_users = instance.num_users();

        let mut var_of = vec![vec![None; num_users]; num_steps];
        let mut step_vars = vec![Vec::new(); num_steps];
        let mut user_vars = vec![Vec::new(); num_users];
        let mut next: Var = 0;

        for step in 0..num_steps {
            for user in instance.authorized_users(step) {
                var_of[step][user] = Some(next);
                step_vars[step].push((user, next));
                user_vars[user].push((step, next));
                next += 1;
            }
        }

        VariableManager {
            instance,
            var_of,
            step_vars,
            user_vars,
            count: next as usize,
        }
    }

    /// The number of variables created.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The variable for `(step, user)`, if that pair is authorized.
    pub fn var(&self, step: Step, user: User) -> Option<Var> {
        self.var_of[step][user]
    }

    /// The `(user, var)` pairs of `step`, in ascending user order.
    pub fn step_vars(&self, step: Step) -> &[(User, Var)] {
        &self.step_vars[step]
    }

    /// The `(step, var)` pairs of `user`, in ascending step order.
    pub fn user_vars(&self, user: User) -> &[(Step, Var)] {
        &self.user_vars[user]
    }

    /// The users authorized for `step`, in ascending order.
    pub fn authorized_users(&self, step: Step) -> impl Iterator<Item = User> + '_ {
        self.instance.authorized_users(step)
    }

    /// The steps `user` is authorized for, in ascending order.
    pub fn authorized_steps(&self, user: User) -> &[Step] {
        self.instance.authorized_steps(user)
    }

    /// The members of `group` authorized for `step`.
    pub fn department_auth(&self, step: Step, group: &[User]) -> Vec<User> {
        group
            .iter()
            .copied()
            .filter(|&u| self.instance.is_authorized(step, u))
            .collect()
    }

    /// Reads a complete model (one bool per variable, indexed by [Var]) into
    /// a `step -> user` mapping.
    ///
    /// The cardinality (Authorization) encoding is the sole reason each
    /// step's selection is unique; this does not re-derive or arbitrate
    /// that invariant, only reports when it is broken.
    pub fn assignment_from_model(&self, model: &[bool]) -> Result<Vec<User>, InternalError> {
        let mut assignment = Vec::with_capacity(self.step_vars.len());
        for (step, vars) in self.step_vars.iter().enumerate() {
            let mut chosen = None;
            for &(user, var) in vars {
                if model[var as usize] {
                    if chosen.is_some() {
                        return Err(InternalError::AmbiguousStepSelection(step));
                    }
                    chosen = Some(user);
                }
            }
            match chosen {
                Some(user) => assignment.push(user),
                None => return Err(InternalError::AmbiguousStepSelection(step)),
            }
        }
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_one_variable_per_authorized_pair() {
        let auth = vec![vec![true, false], vec![true, true]];
        let instance = Instance::new(auth, Vec::new());
        let vm = VariableManager::create(&instance);
        assert_eq!(vm.len(), 3);
        assert!(vm.var(0, 1).is_none());
        assert!(vm.var(1, 1).is_some());
    }

    #[test]
    fn reads_a_consistent_model() {
        let auth = vec![vec![true, true], vec![true, true]];
        let instance = Instance::new(auth, Vec::new());
        let vm = VariableManager::create(&instance);

        let mut model = vec![false; vm.len()];
        model[vm.var(0, 0).unwrap() as usize] = true;
        model[vm.var(1, 1).unwrap() as usize] = true;

        let assignment = vm.assignment_from_model(&model).unwrap();
        assert_eq!(assignment, vec![0, 1]);
    }

    #[test]
    fn rejects_a_step_with_two_true_variables() {
        let auth = vec![vec![true, true]];
        let instance = Instance::new(auth, Vec::new());
        let vm = VariableManager::create(&instance);

        let model = vec![true, true];
        assert!(matches!(
            vm.assignment_from_model(&model),
            Err(InternalError::AmbiguousStepSelection(0))
        ));
    }
}
