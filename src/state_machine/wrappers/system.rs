use impl_trait_for_tuples::impl_for_tuples;
use jiff::Timestamp;

use crate::recorder::SessionId;
use crate::route::RouteId;

/// The [`SystemResource`] trait indicates that a type is a resource inherently provided by the
/// system context of the application, such as the wall clock or a fresh random identifier.
///
/// Runners call [`generate`](SystemResource::generate) and pass the value into a
/// [`StateMachine`](super::super::StateMachine) as input, keeping the machine itself pure.
pub trait SystemResource {
    /// Produce an instance of this resource from only the implicit system context.
    fn generate() -> Self;
}

#[impl_for_tuples(1, 4)]
impl SystemResource for Tuple {
    fn generate() -> Self {
        for_tuples!( ( #( Tuple::generate() ),* ) )
    }
}

impl SystemResource for Timestamp {
    fn generate() -> Self {
        Timestamp::now()
    }
}

impl SystemResource for RouteId {
    fn generate() -> Self {
        RouteId::generate()
    }
}

impl SystemResource for SessionId {
    fn generate() -> Self {
        SessionId::generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tuple_generates_each_member() {
        let before = Timestamp::now();
        let (a, b, at): (RouteId, RouteId, Timestamp) = SystemResource::generate();

        assert_ne!(a, b);
        assert!(at >= before);
    }
}
