//! The sponge rules.
//!
//! A placed sponge evaporates liquids around it, liquids may not flow into
//! its reach, it breaks the moment a player starts damaging it, and the
//! player that broke it does not take fall damage for a short while after.

use std::sync::Arc;

use sponge_utils::{BlockPos, Clock, Material};

use crate::config::SpongeConfig;
use crate::event::{
    BlockDamageEvent, BlockFromToEvent, BlockPlaceEvent, Cancellable, DamageCause,
    EntityDamageEvent, EventBus, EventPriority, PlayerQuitEvent,
};
use crate::invulnerability::InvulnerabilityTable;
use crate::world::World;

/// Reacts to world events on behalf of sponge blocks.
pub struct SpongeListener {
    config: SpongeConfig,
    clock: Arc<dyn Clock>,
    invulnerable: Arc<InvulnerabilityTable>,
}

impl SpongeListener {
    /// Creates a listener that stores grants in `invulnerable`.
    #[must_use]
    pub fn new(
        config: SpongeConfig,
        clock: Arc<dyn Clock>,
        invulnerable: Arc<InvulnerabilityTable>,
    ) -> Self {
        Self {
            config,
            clock,
            invulnerable,
        }
    }

    /// The grant table this listener writes to.
    #[must_use]
    pub fn invulnerable(&self) -> &Arc<InvulnerabilityTable> {
        &self.invulnerable
    }

    /// The config this listener runs with.
    #[must_use]
    pub fn config(&self) -> &SpongeConfig {
        &self.config
    }

    /// Registers all five reactions on `bus`.
    pub fn register(self: &Arc<Self>, bus: &mut EventBus) {
        let listener = self.clone();
        bus.register(
            EventPriority::Monitor,
            true,
            move |event: &mut BlockPlaceEvent, world: &dyn World| {
                listener.clear_liquids(event, world);
            },
        );

        let listener = self.clone();
        bus.register(
            EventPriority::High,
            true,
            move |event: &mut BlockFromToEvent, world: &dyn World| {
                listener.block_liquids(event, world);
            },
        );

        let listener = self.clone();
        bus.register(
            EventPriority::Monitor,
            true,
            move |event: &mut BlockDamageEvent, world: &dyn World| {
                listener.break_sponge(event, world);
            },
        );

        let listener = self.clone();
        bus.register(
            EventPriority::High,
            true,
            move |event: &mut EntityDamageEvent, _: &dyn World| {
                listener.protect_player(event);
            },
        );

        // Quit events cannot be cancelled, so there is nothing to ignore.
        let listener = self.clone();
        bus.register(
            EventPriority::Monitor,
            false,
            move |event: &mut PlayerQuitEvent, _: &dyn World| {
                listener.remove_invulnerability(event);
            },
        );
    }

    /// Turns every liquid near a freshly placed sponge into air.
    ///
    /// Offsets run over `[-radius, radius)` on each axis, one block short on
    /// the positive side, and stop at the coordinate limits. Returns how many
    /// blocks were cleared.
    pub fn clear_liquids(&self, event: &BlockPlaceEvent, world: &dyn World) -> usize {
        let center = event.pos;
        if world.get_block(center) != Material::Sponge {
            return 0;
        }

        let radius = self.config.radius;
        let mut cleared = 0;
        for x in -radius..radius {
            for y in -radius..radius {
                for z in -radius..radius {
                    let pos = center.offset(x, y, z);
                    if center.y.abs_diff(pos.y) > radius.unsigned_abs() {
                        continue;
                    }
                    if !world.get_block(pos).is_liquid() {
                        continue;
                    }
                    if world.set_block(pos, Material::Air) {
                        cleared += 1;
                    }
                }
            }
        }

        if cleared > 0 {
            log::debug!("Sponge at {center} cleared {cleared} liquid block(s)");
        }
        cleared
    }

    /// Cancels liquid flowing into a dry block within reach of a sponge.
    pub fn block_liquids(&self, event: &mut BlockFromToEvent, world: &dyn World) {
        if event.from == event.to {
            return;
        }
        if !world.get_block(event.from).is_liquid() {
            return;
        }
        // Liquid spreading through liquid is never blocked.
        if world.get_block(event.to).is_liquid() {
            return;
        }

        if let Some(sponge) = self.find_sponge(world, event.to) {
            log::debug!(
                "Blocked flow {} -> {} near sponge at {sponge}",
                event.from,
                event.to
            );
            event.set_cancelled(true);
        }
    }

    /// Breaks a sponge instantly and grants the player fall immunity.
    pub fn break_sponge(&self, event: &mut BlockDamageEvent, world: &dyn World) {
        if world.get_block(event.pos) != Material::Sponge {
            return;
        }

        event.set_instant_break(true);

        let now = self.clock.now_millis();
        self.invulnerable.grant(event.player.uuid, now);
        log::debug!(
            "{} broke sponge at {}, fall immune from {now}",
            event.player.name,
            event.pos
        );
    }

    /// Cancels fall damage for players holding a fresh grant.
    ///
    /// The grant is left in place, so every fall inside the window is
    /// cancelled, not only the first.
    pub fn protect_player(&self, event: &mut EntityDamageEvent) {
        let Some(cause) = event.cause else {
            return;
        };
        if cause != DamageCause::Fall {
            return;
        }
        let Some(player) = event.entity.as_player() else {
            return;
        };

        let now = self.clock.now_millis();
        if !self
            .invulnerable
            .is_protected(&player.uuid, now, self.config.invulnerability_millis)
        {
            return;
        }

        log::debug!("Cancelled fall damage for {}", player.name);
        event.set_cancelled(true);
    }

    /// Forgets the grant of a player that left.
    pub fn remove_invulnerability(&self, event: &PlayerQuitEvent) {
        if self.invulnerable.revoke(&event.player.uuid) {
            log::debug!("Removed fall immunity of {}", event.player.name);
        }
    }

    /// Looks for a sponge in the box `radius` blocks around `center`, both
    /// ends inclusive, clamped to the world's height range.
    fn find_sponge(&self, world: &dyn World, center: BlockPos) -> Option<BlockPos> {
        let radius = self.config.radius;
        let heights = world.height_range();
        let min_y = center.y.saturating_sub(radius).max(*heights.start());
        let max_y = center.y.saturating_add(radius).min(*heights.end());
        let (min_x, max_x) = (center.x.saturating_sub(radius), center.x.saturating_add(radius));
        let (min_z, max_z) = (center.z.saturating_sub(radius), center.z.saturating_add(radius));

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                for z in min_z..=max_z {
                    let pos = BlockPos::new(x, y, z);
                    if world.get_block(pos) == Material::Sponge {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use sponge_utils::ManualClock;
    use uuid::Uuid;

    use super::*;
    use crate::event::{Entity, Event, Player};
    use crate::world::RamWorld;

    const LIQUIDS: [Material; 4] = [
        Material::Water,
        Material::FlowingWater,
        Material::Lava,
        Material::FlowingLava,
    ];

    fn listener_at(start: u64) -> (SpongeListener, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start));
        let listener = SpongeListener::new(
            SpongeConfig::default(),
            clock.clone(),
            Arc::new(InvulnerabilityTable::new()),
        );
        (listener, clock)
    }

    fn steve() -> Player {
        Player::new(Uuid::new_v4(), "Steve")
    }

    fn place_sponge(listener: &SpongeListener, world: &RamWorld, pos: BlockPos) -> usize {
        world.set_block(pos, Material::Sponge);
        listener.clear_liquids(&BlockPlaceEvent::new(pos, steve()), world)
    }

    fn fall(player: &Player) -> EntityDamageEvent {
        EntityDamageEvent::new(
            Entity::Player(player.clone()),
            Some(DamageCause::Fall),
            4.0,
        )
    }

    #[test]
    fn test_clears_adjacent_water() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(1, 64, 0), Material::Water);

        assert_eq!(place_sponge(&listener, &world, BlockPos::new(0, 64, 0)), 1);
        assert_eq!(world.get_block(BlockPos::new(1, 64, 0)), Material::Air);
        assert_eq!(world.get_block(BlockPos::new(0, 64, 0)), Material::Sponge);
    }

    #[test]
    fn test_leaves_water_out_of_vertical_reach() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(0, 60, 0), Material::Water);

        assert_eq!(place_sponge(&listener, &world, BlockPos::new(0, 64, 0)), 0);
        assert_eq!(world.get_block(BlockPos::new(0, 60, 0)), Material::Water);
    }

    #[test]
    fn test_clear_region_is_half_open() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        let center = BlockPos::new(10, 64, -10);
        world.fill(center.offset(-5, -5, -5), center.offset(5, 5, 5), Material::Water);
        world.set_block(center, Material::Sponge);

        let cleared = listener.clear_liquids(&BlockPlaceEvent::new(center, steve()), &world);
        // 6^3 cells minus the sponge itself.
        assert_eq!(cleared, 6 * 6 * 6 - 1);

        for dx in -5..=5 {
            for dy in -5..=5 {
                for dz in -5..=5 {
                    let pos = center.offset(dx, dy, dz);
                    let inside = [dx, dy, dz].iter().all(|d| (-3..3).contains(d));
                    let expected = if pos == center {
                        Material::Sponge
                    } else if inside {
                        Material::Air
                    } else {
                        Material::Water
                    };
                    assert_eq!(world.get_block(pos), expected, "at {pos}");
                }
            }
        }
    }

    #[test]
    fn test_clears_every_liquid_kind_only() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        let center = BlockPos::new(0, 64, 0);
        for (i, liquid) in LIQUIDS.into_iter().enumerate() {
            world.set_block(center.offset(i as i32 - 2, 0, 1), liquid);
        }
        world.set_block(center.offset(0, -1, 0), Material::Stone);

        assert_eq!(place_sponge(&listener, &world, center), 4);
        assert_eq!(world.get_block(center.offset(0, -1, 0)), Material::Stone);
    }

    #[test]
    fn test_clear_ignores_other_blocks() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        let pos = BlockPos::new(0, 64, 0);
        world.set_block(pos, Material::Stone);
        world.set_block(pos.offset(1, 0, 0), Material::Water);

        assert_eq!(
            listener.clear_liquids(&BlockPlaceEvent::new(pos, steve()), &world),
            0
        );
        assert_eq!(world.get_block(pos.offset(1, 0, 0)), Material::Water);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(-1, 63, 0), Material::Lava);
        let center = BlockPos::new(0, 64, 0);

        assert_eq!(place_sponge(&listener, &world, center), 1);
        let event = BlockPlaceEvent::new(center, steve());
        assert_eq!(listener.clear_liquids(&event, &world), 0);
        assert_eq!(world.block_count(), 1);
    }

    #[test]
    fn test_flow_near_sponge_is_cancelled() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(0, 64, 0), Material::Sponge);
        world.set_block(BlockPos::new(4, 64, 0), Material::Water);

        // Destination (3, 64, 0) is three blocks from the sponge.
        let mut event = BlockFromToEvent::new(BlockPos::new(4, 64, 0), BlockPos::new(3, 64, 0));
        listener.block_liquids(&mut event, &world);
        assert!(event.is_cancelled());

        // Inclusive corner of the box.
        world.set_block(BlockPos::new(4, 67, 4), Material::FlowingLava);
        let mut event = BlockFromToEvent::new(BlockPos::new(4, 67, 4), BlockPos::new(3, 67, 3));
        listener.block_liquids(&mut event, &world);
        assert!(event.is_cancelled());
    }

    #[test]
    fn test_flow_far_from_sponge_proceeds() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(0, 64, 0), Material::Sponge);
        world.set_block(BlockPos::new(5, 64, 0), Material::Water);

        let mut event = BlockFromToEvent::new(BlockPos::new(5, 64, 0), BlockPos::new(4, 64, 0));
        listener.block_liquids(&mut event, &world);
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_flow_into_liquid_is_never_cancelled() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(0, 64, 0), Material::Sponge);
        world.set_block(BlockPos::new(1, 64, 0), Material::Water);
        world.set_block(BlockPos::new(2, 64, 0), Material::FlowingWater);

        let mut event = BlockFromToEvent::new(BlockPos::new(1, 64, 0), BlockPos::new(2, 64, 0));
        listener.block_liquids(&mut event, &world);
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_flow_needs_liquid_source_and_distinct_blocks() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(0, 64, 0), Material::Sponge);
        world.set_block(BlockPos::new(1, 64, 0), Material::Water);

        let mut same = BlockFromToEvent::new(BlockPos::new(2, 64, 0), BlockPos::new(2, 64, 0));
        listener.block_liquids(&mut same, &world);
        assert!(!same.is_cancelled());

        world.set_block(BlockPos::new(2, 64, 0), Material::Sand);
        let mut dry = BlockFromToEvent::new(BlockPos::new(2, 64, 0), BlockPos::new(2, 63, 0));
        listener.block_liquids(&mut dry, &world);
        assert!(!dry.is_cancelled());
    }

    #[test]
    fn test_flow_scan_is_clamped_to_world_height() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        // Below the world: a host would never report this, but it must not be found.
        world.set_block(BlockPos::new(0, -1, 0), Material::Sponge);
        world.set_block(BlockPos::new(1, 1, 0), Material::Water);

        let mut event = BlockFromToEvent::new(BlockPos::new(1, 1, 0), BlockPos::new(0, 1, 0));
        listener.block_liquids(&mut event, &world);
        assert!(!event.is_cancelled());

        world.set_block(BlockPos::new(0, 0, 0), Material::Sponge);
        listener.block_liquids(&mut event, &world);
        assert!(event.is_cancelled());
    }

    #[test]
    fn test_flow_scan_stops_at_world_top() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        // Above the default top of 256: within reach, but outside the world.
        world.set_block(BlockPos::new(0, 257, 0), Material::Sponge);
        world.set_block(BlockPos::new(1, 255, 0), Material::Water);

        let mut event = BlockFromToEvent::new(BlockPos::new(1, 255, 0), BlockPos::new(0, 255, 0));
        listener.block_liquids(&mut event, &world);
        assert!(!event.is_cancelled());

        world.set_block(BlockPos::new(0, 256, 0), Material::Sponge);
        listener.block_liquids(&mut event, &world);
        assert!(event.is_cancelled());
    }

    #[test]
    fn test_flow_scan_follows_custom_height_range() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::with_height_range(-64..=320);
        world.set_block(BlockPos::new(0, -62, 0), Material::Sponge);
        world.set_block(BlockPos::new(1, -60, 0), Material::Water);

        let mut low = BlockFromToEvent::new(BlockPos::new(1, -60, 0), BlockPos::new(0, -60, 0));
        listener.block_liquids(&mut low, &world);
        assert!(low.is_cancelled());

        world.set_block(BlockPos::new(0, 321, 0), Material::Sponge);
        world.set_block(BlockPos::new(1, 319, 0), Material::Water);
        let mut high = BlockFromToEvent::new(BlockPos::new(1, 319, 0), BlockPos::new(0, 319, 0));
        listener.block_liquids(&mut high, &world);
        assert!(!high.is_cancelled());

        world.set_block(BlockPos::new(0, 318, 0), Material::Sponge);
        listener.block_liquids(&mut high, &world);
        assert!(high.is_cancelled());
    }

    #[test]
    fn test_clear_near_coordinate_limit() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        let center = BlockPos::new(i32::MAX - 1, 64, i32::MIN);
        world.set_block(BlockPos::new(i32::MAX, 64, i32::MIN), Material::Water);
        world.set_block(BlockPos::new(i32::MAX - 3, 64, i32::MIN + 2), Material::Lava);

        assert_eq!(place_sponge(&listener, &world, center), 2);
        assert_eq!(world.block_count(), 1);
    }

    #[test]
    fn test_flow_near_coordinate_limit() {
        let (listener, _) = listener_at(0);
        let world = RamWorld::new();
        world.set_block(BlockPos::new(i32::MAX - 2, 64, 0), Material::Sponge);
        world.set_block(BlockPos::new(i32::MAX - 1, 64, 0), Material::Water);

        let mut event = BlockFromToEvent::new(
            BlockPos::new(i32::MAX - 1, 64, 0),
            BlockPos::new(i32::MAX, 64, 0),
        );
        listener.block_liquids(&mut event, &world);
        assert!(event.is_cancelled());

        world.set_block(BlockPos::new(i32::MIN + 3, 64, i32::MIN), Material::Sponge);
        world.set_block(BlockPos::new(i32::MIN + 1, 64, i32::MIN), Material::Lava);
        let mut event = BlockFromToEvent::new(
            BlockPos::new(i32::MIN + 1, 64, i32::MIN),
            BlockPos::new(i32::MIN, 64, i32::MIN),
        );
        listener.block_liquids(&mut event, &world);
        assert!(event.is_cancelled());
    }

    #[test]
    fn test_break_sponge_grants_immunity() {
        let (listener, _) = listener_at(1000);
        let world = RamWorld::new();
        let pos = BlockPos::new(0, 64, 0);
        world.set_block(pos, Material::Sponge);
        let player = steve();

        let mut event = BlockDamageEvent::new(pos, player.clone());
        listener.break_sponge(&mut event, &world);

        assert!(event.instant_break());
        assert_eq!(listener.invulnerable().granted_at(&player.uuid), Some(1000));
    }

    #[test]
    fn test_break_other_block_does_nothing() {
        let (listener, _) = listener_at(1000);
        let world = RamWorld::new();
        let pos = BlockPos::new(0, 64, 0);
        world.set_block(pos, Material::Dirt);
        let player = steve();

        let mut event = BlockDamageEvent::new(pos, player.clone());
        listener.break_sponge(&mut event, &world);

        assert!(!event.instant_break());
        assert!(listener.invulnerable().is_empty());
    }

    #[test]
    fn test_fall_protection_window() {
        let (listener, clock) = listener_at(1000);
        let world = RamWorld::new();
        let pos = BlockPos::new(0, 64, 0);
        world.set_block(pos, Material::Sponge);
        let player = steve();

        listener.break_sponge(&mut BlockDamageEvent::new(pos, player.clone()), &world);

        clock.set(1050);
        let mut first = fall(&player);
        listener.protect_player(&mut first);
        assert!(first.is_cancelled());

        // Still inside the window: the grant is reusable.
        clock.set(1100);
        let mut second = fall(&player);
        listener.protect_player(&mut second);
        assert!(second.is_cancelled());

        clock.set(1150);
        let mut late = fall(&player);
        listener.protect_player(&mut late);
        assert!(!late.is_cancelled());
        assert_eq!(listener.invulnerable().granted_at(&player.uuid), Some(1000));
    }

    #[test]
    fn test_only_fall_damage_to_players_is_cancelled() {
        let (listener, _) = listener_at(0);
        let player = steve();
        listener.invulnerable().grant(player.uuid, 0);

        let mut lava = EntityDamageEvent::new(
            Entity::Player(player.clone()),
            Some(DamageCause::Lava),
            4.0,
        );
        listener.protect_player(&mut lava);
        assert!(!lava.is_cancelled());

        let mut unknown = EntityDamageEvent::new(Entity::Player(player.clone()), None, 4.0);
        listener.protect_player(&mut unknown);
        assert!(!unknown.is_cancelled());

        let mut mob = EntityDamageEvent::new(
            Entity::Other { entity_id: 7 },
            Some(DamageCause::Fall),
            4.0,
        );
        listener.protect_player(&mut mob);
        assert!(!mob.is_cancelled());

        let mut other_player = fall(&steve());
        listener.protect_player(&mut other_player);
        assert!(!other_player.is_cancelled());
    }

    #[test]
    fn test_quit_removes_grant() {
        let (listener, _) = listener_at(0);
        let player = steve();
        listener.invulnerable().grant(player.uuid, 0);

        listener.remove_invulnerability(&PlayerQuitEvent::new(player.clone()));
        assert!(listener.invulnerable().is_empty());

        let mut event = fall(&player);
        listener.protect_player(&mut event);
        assert!(!event.is_cancelled());

        // Quitting without a grant is fine.
        listener.remove_invulnerability(&PlayerQuitEvent::new(player));
    }

    #[test]
    fn test_register_adds_one_handler_per_event() {
        let (listener, _) = listener_at(0);
        let mut bus = EventBus::new();
        Arc::new(listener).register(&mut bus);

        assert_eq!(bus.handler_count::<BlockPlaceEvent>(), 1);
        assert_eq!(bus.handler_count::<BlockFromToEvent>(), 1);
        assert_eq!(bus.handler_count::<BlockDamageEvent>(), 1);
        assert_eq!(bus.handler_count::<EntityDamageEvent>(), 1);
        assert_eq!(bus.handler_count::<PlayerQuitEvent>(), 1);
    }
}
