use crate::components::MAP_SIZE;
use crate::tilemap::{is_wall, RoomView};

/// Sign of `v` as a float, `0.0` for zero.
pub fn unit(v: f32) -> f32 {
    if v == 0.0 {
        0.0
    } else {
        v / v.abs()
    }
}

/// Gravity-free kinematic box shared by the player and the spider.
///
/// `x`/`y` is the top-left corner of a `size`×`size` box in room pixels.
/// Callers set `dx`/`dy` and then call [`Body::step`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Body {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub right: bool,
    pub size: u32,
}

impl Default for Body {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 0.0,
            right: true,
            size: 8,
        }
    }
}

impl Body {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    fn face_motion(&mut self) {
        if self.dx > 0.0 {
            self.right = true;
        } else if self.dx < 0.0 {
            self.right = false;
        }
    }

    /// Resolve the pending velocity against the room tiles and apply it.
    ///
    /// The first probe looks ahead along `dx` at the row of travel and
    /// cancels `dx`; the second looks ahead along `dy` at the leading
    /// column and cancels `dy`. Afterwards the box is kept inside the room
    /// horizontally and below the top edge. There is no bottom clamp.
    pub fn step(&mut self, room: &RoomView) {
        let half = (self.size / 2) as f32;
        let semi_collide = self.dy > 0.0;

        let ahead = room.block_at(
            self.x + half + self.dx + unit(self.dx) * half,
            self.y + half + unit(self.dy) * half,
        );
        if is_wall(ahead, semi_collide) {
            self.dx = 0.0;
        }

        self.face_motion();

        let below = room.block_at(
            self.x + half + unit(self.dx) * half,
            self.y + self.dy + half + unit(self.dy) * half,
        );
        if is_wall(below, semi_collide) {
            self.dy = 0.0;
        }

        self.dx = self.dx.max(-self.x).min(MAP_SIZE - self.x - self.size as f32);
        self.dy = self.dy.max(-self.y);

        self.face_motion();

        self.x += self.dx;
        self.y += self.dy;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::*;
    use crate::tilemap::Tilemap;

    fn open_room() -> Tilemap {
        Tilemap::filled(ROOM_CELLS, ROOM_CELLS, EMPTY_TILE)
    }

    fn floored_room(floor: i32) -> Tilemap {
        let mut map = open_room();
        for x in 0..ROOM_CELLS as i32 {
            map.set(x, floor, GROUND_TILE);
        }
        map
    }

    #[test]
    fn unit_is_sign_or_zero() {
        assert_eq!(unit(0.0), 0.0);
        assert_eq!(unit(3.5), 1.0);
        assert_eq!(unit(-0.25), -1.0);
    }

    #[test]
    fn clamps_at_left_edge() {
        let map = open_room();
        let mut body = Body::at(0.0, 40.0);
        body.dx = -5.0;
        body.step(&RoomView::new(&map, 0));
        assert_eq!(body.x, 0.0);
        assert_eq!(body.dx, 0.0);
    }

    #[test]
    fn clamps_at_right_edge() {
        let map = open_room();
        let mut body = Body::at(118.0, 40.0);
        body.dx = 5.0;
        body.step(&RoomView::new(&map, 0));
        assert_eq!(body.x, MAP_SIZE - 8.0);
        assert!(body.right);
    }

    #[test]
    fn clamps_at_room_top() {
        let map = open_room();
        let mut body = Body::at(20.0, 0.0);
        body.dy = -3.0;
        body.step(&RoomView::new(&map, 0));
        assert_eq!(body.y, 0.0);
    }

    #[test]
    fn no_clamp_below_room() {
        let map = open_room();
        let mut body = Body::at(20.0, MAP_SIZE - 2.0);
        body.dy = 5.0;
        body.step(&RoomView::new(&map, 0));
        assert_eq!(body.y, MAP_SIZE + 3.0);
    }

    #[test]
    fn lands_on_ground() {
        let map = floored_room(13);
        let mut body = Body::at(20.0, 95.0);
        body.dy = 2.0;
        body.step(&RoomView::new(&map, 0));
        assert_eq!(body.dy, 0.0);
        assert_eq!(body.y, 95.0);
    }

    #[test]
    fn wall_ahead_cancels_dx() {
        let mut map = floored_room(13);
        map.set(5, 12, GROUND_TILE);
        let mut body = Body::at(31.0, 95.8);
        body.dx = 1.0;
        body.dy = 0.25;
        body.step(&RoomView::new(&map, 0));
        assert_eq!(body.dx, 0.0);
        assert_eq!(body.x, 31.0);
    }

    #[test]
    fn semi_solid_only_blocks_from_above() {
        let mut map = open_room();
        map.set(2, 6, PLATFORM_TILE);
        let view = RoomView::new(&map, 0);

        let mut falling = Body::at(16.0, 39.0);
        falling.dy = 2.0;
        falling.step(&view);
        assert_eq!(falling.y, 39.0);

        let mut rising = Body::at(16.0, 58.0);
        rising.dy = -3.0;
        rising.step(&view);
        assert_eq!(rising.y, 55.0);
    }

    #[test]
    fn facing_follows_dx() {
        let map = open_room();
        let view = RoomView::new(&map, 0);
        let mut body = Body::at(40.0, 40.0);
        body.dx = -1.0;
        body.step(&view);
        assert!(!body.right);
        body.dx = 0.0;
        body.step(&view);
        assert!(!body.right);
        body.dx = 1.0;
        body.step(&view);
        assert!(body.right);
    }
}
