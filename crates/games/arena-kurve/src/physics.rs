use crate::{Move, Point};

/// Wrap a heading into `[0, 360)`.
pub fn normalize_heading(degrees: f64) -> f64 {
    let h = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if h >= 360.0 { 0.0 } else { h }
}

/// Heading after applying one tick's move. Left turns counter-clockwise.
pub fn apply_turn(heading: f64, mv: Move, turn_rate: f64) -> f64 {
    match mv {
        Move::Left => normalize_heading(heading + turn_rate),
        Move::Right => normalize_heading(heading - turn_rate),
        Move::Straight => heading,
    }
}

/// Position after travelling `speed` units along `heading`.
pub fn translate(position: Point, heading: f64, speed: f64) -> Point {
    let rad = heading.to_radians();
    Point::new(
        position.x + rad.cos() * speed,
        position.y + rad.sin() * speed,
    )
}

/// One full tick of movement: turn first, then move along the new heading.
pub fn step(position: Point, heading: f64, mv: Move, speed: f64, turn_rate: f64) -> (Point, f64) {
    let heading = apply_turn(heading, mv, turn_rate);
    (translate(position, heading, speed), heading)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_increases_heading() {
        assert_eq!(apply_turn(90.0, Move::Left, 5.0), 95.0);
        assert_eq!(apply_turn(90.0, Move::Right, 5.0), 85.0);
        assert_eq!(apply_turn(90.0, Move::Straight, 5.0), 90.0);
    }

    #[test]
    fn heading_wraps_both_ways() {
        assert_eq!(apply_turn(357.0, Move::Left, 5.0), 2.0);
        assert_eq!(apply_turn(2.0, Move::Right, 5.0), 357.0);
        assert_eq!(normalize_heading(-360.0), 0.0);
        assert_eq!(normalize_heading(720.0), 0.0);
        assert_eq!(normalize_heading(-1e-20), 0.0);
    }

    #[test]
    fn turn_happens_before_move() {
        let (pos, heading) = step(Point::new(100.0, 100.0), 0.0, Move::Left, 3.0, 90.0);
        assert_eq!(heading, 90.0);
        assert!((pos.x - 100.0).abs() < 1e-9);
        assert!((pos.y - 103.0).abs() < 1e-9);
    }

    #[test]
    fn straight_east_moves_exactly_speed() {
        let pos = translate(Point::new(10.0, 20.0), 0.0, 3.0);
        assert_eq!(pos, Point::new(13.0, 20.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_move() -> impl Strategy<Value = Move> {
            prop_oneof![Just(Move::Left), Just(Move::Right), Just(Move::Straight)]
        }

        proptest! {
            #[test]
            fn heading_always_normalized(
                heading in 0.0f64..360.0,
                mv in any_move(),
                rate in 0.0f64..90.0,
            ) {
                let h = apply_turn(heading, mv, rate);
                prop_assert!((0.0..360.0).contains(&h), "heading {h} out of range");
            }

            #[test]
            fn step_obeys_physics_law(
                x in 0.0f64..640.0,
                y in 0.0f64..480.0,
                heading in 0.0f64..360.0,
                mv in any_move(),
            ) {
                let (pos, new_heading) = step(Point::new(x, y), heading, mv, 3.0, 5.0);
                let expected_heading = match mv {
                    Move::Left => (heading + 5.0).rem_euclid(360.0),
                    Move::Right => (heading - 5.0).rem_euclid(360.0),
                    Move::Straight => heading,
                };
                prop_assert!((new_heading - expected_heading).abs() < 1e-9
                    || (new_heading - expected_heading).abs() > 359.999);
                let rad = new_heading.to_radians();
                prop_assert!((pos.x - (x + 3.0 * rad.cos())).abs() < 1e-9);
                prop_assert!((pos.y - (y + 3.0 * rad.sin())).abs() < 1e-9);
                prop_assert!((Point::new(x, y).distance(pos) - 3.0).abs() < 1e-9);
            }
        }
    }
}
