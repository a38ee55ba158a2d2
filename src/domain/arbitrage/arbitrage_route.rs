//! Route selection between the two venues

use super::Direction;

/// Order `(first, second)` according to `direction`.
pub fn select_route<T>(direction: Direction, first: T, second: T) -> (T, T) {
    match direction {
        Direction::SecondVenueThenFirst => (second, first),
        Direction::FirstVenueThenSecond => (first, second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_keeps_order() {
        assert_eq!(select_route(Direction::FirstVenueThenSecond, "amm", "rfq"), ("amm", "rfq"));
    }

    #[test]
    fn opposite_flags_swap_the_pair() {
        let forward = select_route(Direction::FirstVenueThenSecond, "amm", "rfq");
        let reverse = select_route(Direction::SecondVenueThenFirst, "amm", "rfq");
        assert_eq!(reverse, (forward.1, forward.0));
    }

    #[test]
    fn swapping_twice_restores_order() {
        let (a, b) = select_route(Direction::SecondVenueThenFirst, "amm", "rfq");
        assert_eq!(select_route(Direction::SecondVenueThenFirst, a, b), ("amm", "rfq"));
    }

    #[test]
    fn selection_is_deterministic() {
        for direction in [Direction::FirstVenueThenSecond, Direction::SecondVenueThenFirst] {
            assert_eq!(select_route(direction, 1, 2), select_route(direction, 1, 2));
        }
    }
}
