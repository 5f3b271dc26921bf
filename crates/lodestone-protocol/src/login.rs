/// Sent once when joining. Carries the dimension the player spawns in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Login {
    pub entity_id: i32,
    pub dimension: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Respawn {
    pub dimension: i32,
}
