//! One round of the Monty Hall game.
use rand::Rng;

use crate::constants::{DOOR_COUNT, MAX_REJECTION_DRAWS};

/// What stands behind a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Door {
    /// The prize. Ending on this door is a win.
    Car,
    /// The gag prize.
    Goat,
}

/// The three doors of one game, exactly one hiding the car.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Doors([Door; DOOR_COUNT]);

impl Doors {
    /// # Panics
    ///
    /// Panics if `car` is not a valid door index.
    #[must_use]
    pub fn with_car_behind(car: usize) -> Self {
        assert!(car < DOOR_COUNT, "door index {car} out of range");
        let mut doors = [Door::Goat; DOOR_COUNT];
        doors[car] = Door::Car;
        Self(doors)
    }

    /// # Panics
    ///
    /// Panics if `door` is not a valid door index.
    #[must_use]
    pub const fn behind(&self, door: usize) -> Door {
        self.0[door]
    }
}

/// Result of a single game under both strategies.
///
/// At most one of the two flags is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameOutcome {
    pub won_by_staying: bool,
    pub won_by_switching: bool,
}

/// Play one round: hide the car, take a first pick, let the host open a goat
/// door, then evaluate staying and switching.
pub fn play_round<R: Rng + ?Sized>(rng: &mut R) -> GameOutcome {
    let car = rng.gen_range(0..DOOR_COUNT);
    let doors = Doors::with_car_behind(car);
    let first_pick = rng.gen_range(0..DOOR_COUNT);

    let revealed = pick_door_excluding(rng, |door| {
        doors.behind(door) == Door::Car || door == first_pick
    });
    let won_by_staying = first_pick == car;

    let switch_pick = pick_door_excluding(rng, |door| door == first_pick || door == revealed);
    let won_by_switching = doors.behind(switch_pick) == Door::Car;

    debug_assert!(!(won_by_staying && won_by_switching));
    GameOutcome {
        won_by_staying,
        won_by_switching,
    }
}

/// Draw doors uniformly until one is not excluded.
///
/// The loop is capped at [`MAX_REJECTION_DRAWS`]; past that the answer is
/// drawn directly from the eligible set, which has the same distribution.
fn pick_door_excluding<R, F>(rng: &mut R, excluded: F) -> usize
where
    R: Rng + ?Sized,
    F: Fn(usize) -> bool,
{
    for _ in 0..MAX_REJECTION_DRAWS {
        let door = rng.gen_range(0..DOOR_COUNT);
        if !excluded(door) {
            return door;
        }
    }

    let mut eligible = [0usize; DOOR_COUNT];
    let mut count = 0;
    for door in (0..DOOR_COUNT).filter(|&door| !excluded(door)) {
        eligible[count] = door;
        count += 1;
    }
    debug_assert!(count > 0, "at least one door must remain eligible");
    eligible[rng.gen_range(0..count.max(1))]
}
