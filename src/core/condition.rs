//! Guard conditions for transitions.
//!
//! A condition is a side-effect-free boolean check evaluated once per
//! transition per tick. Plain closures are conditions, and so is any type
//! implementing [`Condition`] directly.

/// Capability guarding a transition.
///
/// # Example
///
/// ```rust
/// use hfsm::core::Condition;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// struct Flag(Rc<Cell<bool>>);
///
/// impl Condition for Flag {
///     fn is_true(&self) -> bool {
///         self.0.get()
///     }
/// }
///
/// let raised = Rc::new(Cell::new(false));
/// let flag = Flag(raised.clone());
/// assert!(!flag.is_true());
/// raised.set(true);
/// assert!(flag.is_true());
/// ```
pub trait Condition {
    /// Evaluate the guard. Must not mutate machine configuration.
    fn is_true(&self) -> bool;
}

impl<F> Condition for F
where
    F: Fn() -> bool,
{
    fn is_true(&self) -> bool {
        self()
    }
}

/// Owned, type-erased condition as stored on a transition.
pub type BoxedCondition = Box<dyn Condition>;

struct Not<C>(C);

impl<C: Condition> Condition for Not<C> {
    fn is_true(&self) -> bool {
        !self.0.is_true()
    }
}

struct All(Vec<BoxedCondition>);

impl Condition for All {
    fn is_true(&self) -> bool {
        self.0.iter().all(|c| c.is_true())
    }
}

struct Any(Vec<BoxedCondition>);

impl Condition for Any {
    fn is_true(&self) -> bool {
        self.0.iter().any(|c| c.is_true())
    }
}

/// Negate a condition.
///
/// ```rust
/// use hfsm::core::condition::{not, Condition};
///
/// assert!(not(|| false).is_true());
/// ```
pub fn not<C: Condition + 'static>(condition: C) -> impl Condition {
    Not(condition)
}

/// True when every condition is true. Empty input is true.
pub fn all(conditions: Vec<BoxedCondition>) -> impl Condition {
    All(conditions)
}

/// True when at least one condition is true. Empty input is false.
pub fn any(conditions: Vec<BoxedCondition>) -> impl Condition {
    Any(conditions)
}

/// Condition that always holds.
pub fn always() -> impl Condition {
    || true
}

/// Condition that never holds.
pub fn never() -> impl Condition {
    || false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn closures_are_conditions() {
        let flag = Rc::new(Cell::new(false));
        let reader = flag.clone();
        let condition = move || reader.get();

        assert!(!condition.is_true());
        flag.set(true);
        assert!(condition.is_true());
    }

    #[test]
    fn not_inverts() {
        assert!(not(never()).is_true());
        assert!(!not(always()).is_true());
    }

    #[test]
    fn all_and_any_combine() {
        let both = all(vec![Box::new(always()), Box::new(never())]);
        let either = any(vec![Box::new(always()), Box::new(never())]);

        assert!(!both.is_true());
        assert!(either.is_true());
    }

    #[test]
    fn empty_combinators() {
        assert!(all(Vec::new()).is_true());
        assert!(!any(Vec::new()).is_true());
    }

    #[test]
    fn condition_is_deterministic() {
        let condition = || 2 + 2 == 4;
        assert_eq!(condition.is_true(), condition.is_true());
    }
}
