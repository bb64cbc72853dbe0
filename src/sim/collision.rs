//! Hit tests between the player and world objects
//!
//! Every obstacle kind collides as its bounding box except the saw, which is
//! a circle inscribed in its box. Spikes intentionally use the full box, not
//! the drawn triangle.

use super::rect::{Rect, circles_overlap};
use super::state::{Obstacle, ObstacleKind, Player, Portal};
use crate::consts::SAW_MARGIN;

/// Whether the player's box touches this obstacle
pub fn obstacle_hit(player: &Rect, obstacle: &Obstacle) -> bool {
    match obstacle.kind {
        ObstacleKind::Cube
        | ObstacleKind::Spike
        | ObstacleKind::ShipWall
        | ObstacleKind::Block
        | ObstacleKind::Platform => player.overlaps(&obstacle.rect),
        ObstacleKind::Saw => saw_hit(player, &obstacle.rect),
    }
}

fn saw_hit(player: &Rect, saw: &Rect) -> bool {
    circles_overlap(
        player.center(),
        player.w / 2.0,
        saw.center(),
        saw.w / 2.0,
        SAW_MARGIN,
    )
}

/// Whether the player is inside a portal's hit zone
pub fn portal_hit(player: &Player, portal: &Portal) -> bool {
    player.bounds().overlaps(&portal.bounds())
}

/// First obstacle the player touches, in list order
pub fn first_obstacle_hit<'a>(player: &Player, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    let bounds = player.bounds();
    obstacles.iter().find(|o| obstacle_hit(&bounds, o))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Mode;

    fn player_at(x: f32, y: f32) -> Player {
        let mut player = Player::default();
        player.x = x;
        player.y = y;
        player
    }

    #[test]
    fn test_cube_overlap() {
        let player = player_at(100.0, 100.0);
        let cube = Obstacle::new(ObstacleKind::Cube, 129.0, 100.0, 38.0, 38.0);
        assert!(obstacle_hit(&player.bounds(), &cube));

        let clear = Obstacle::new(ObstacleKind::Cube, 130.0, 100.0, 38.0, 38.0);
        assert!(!obstacle_hit(&player.bounds(), &clear));
    }

    #[test]
    fn test_spike_uses_full_box() {
        // Top-left corner of a spike's box is empty space in the drawn triangle
        let spike = Obstacle::new(ObstacleKind::Spike, 200.0, 200.0, 30.0, 45.0);
        let player = player_at(200.0 - 29.0, 200.0 - 29.0);
        assert!(obstacle_hit(&player.bounds(), &spike));
    }

    #[test]
    fn test_ship_wall_overlap() {
        let wall = Obstacle::new(ObstacleKind::ShipWall, 140.0, 50.0, 19.0, 90.0);
        assert!(obstacle_hit(&player_at(120.0, 80.0).bounds(), &wall));
        assert!(!obstacle_hit(&player_at(120.0, 140.0).bounds(), &wall));
    }

    #[test]
    fn test_saw_forgives_corner() {
        // Boxes overlap at the corner but the circles do not
        let saw = Obstacle::new(ObstacleKind::Saw, 128.0, 128.0, 30.0, 30.0);
        let player = player_at(100.0, 100.0);
        assert!(player.bounds().overlaps(&saw.rect));
        assert!(!obstacle_hit(&player.bounds(), &saw));
    }

    #[test]
    fn test_saw_margin() {
        let player = player_at(100.0, 100.0);
        // Centers 28 apart: radii sum 30 minus margin 3 = 27, so no hit
        let near = Obstacle::new(ObstacleKind::Saw, 128.0, 100.0, 30.0, 30.0);
        assert!(!obstacle_hit(&player.bounds(), &near));
        // Centers 26 apart: hit
        let hit = Obstacle::new(ObstacleKind::Saw, 126.0, 100.0, 30.0, 30.0);
        assert!(obstacle_hit(&player.bounds(), &hit));
    }

    #[test]
    fn test_portal_zone() {
        let portal = Portal::new(140.0, 100.0, Mode::Ship);
        assert!(portal_hit(&player_at(120.0, 120.0), &portal));
        // Zone is 44 wide: player starting at x=184 misses
        assert!(!portal_hit(&player_at(184.0, 120.0), &portal));
    }

    #[test]
    fn test_first_hit_in_order() {
        let player = player_at(100.0, 100.0);
        let obstacles = [
            Obstacle::new(ObstacleKind::Spike, 500.0, 100.0, 30.0, 45.0),
            Obstacle::new(ObstacleKind::Cube, 110.0, 110.0, 38.0, 38.0),
            Obstacle::new(ObstacleKind::Spike, 105.0, 105.0, 30.0, 45.0),
        ];
        let hit = first_obstacle_hit(&player, &obstacles).unwrap();
        assert_eq!(hit.kind, ObstacleKind::Cube);
    }
}
