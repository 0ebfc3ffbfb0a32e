//! Execution logic for all ~50 behavior kinds, grouped by family. Most
//! variants within a family share the same underlying shape (check a
//! nearby-entity condition, otherwise fall back to a secondary drive)
//! and differ only in which `BehaviorParams` slots they read and how —
//! mirroring how the source's predator-avoidance classes differ mostly
//! in thresholds and speeds rather than in structure.

use rand::Rng;

use super::context::{BehaviorContext, Nearby};
use super::kind::BehaviorKind;
use super::params::BehaviorParams;

const MAX_MAGNITUDE: f64 = 2.0;

pub fn execute<R: Rng + ?Sized>(
    kind: BehaviorKind,
    params: &BehaviorParams,
    ctx: &BehaviorContext,
    rng: &mut R,
) -> (f64, f64) {
    use BehaviorKind::*;
    let (vx, vy) = match kind {
        DirectSeeker | OpportunisticForager | SurfaceSkimmer | BottomForager => {
            food_seek(ctx, params.get(0) as f64, params.get(1) as f64)
        }
        CautiousApproacher => {
            cautious_seek(ctx, params.get(0) as f64, params.get(1) as f64, params.get(2) as f64)
        }
        MemoryGuidedForager => {
            memory_guided_seek(ctx, params.get(0) as f64, params.get(1) as f64, params.get(2) as f64)
        }
        SchoolFollower => school_then_seek(ctx, params.get(0) as f64, params.get(1) as f64),
        PatientWaiter => {
            if ctx.energy_ratio as f64 > 0.5 {
                (0.0, 0.0)
            } else {
                food_seek(ctx, params.get(0) as f64, params.get(1) as f64)
            }
        }

        PanicFlee => flee_then_seek(ctx, params.get(0) as f64, params.get(1) as f64, 0.7),
        StealthyAvoider => flee_then_seek(ctx, params.get(0) as f64, params.get(1) as f64, 0.6),
        FreezeResponse => freeze_response(ctx, params.get(0) as f64, params.get(1) as f64),
        ErraticEvader => erratic_evade(ctx, params.get(0) as f64, params.get(1) as f64, rng),
        VerticalEscaper => vertical_escape(ctx, params.get(0) as f64, params.get(1) as f64),
        GroupDefender => group_defend(ctx, params.get(0) as f64, params.get(1) as f64),
        SpiralEscape => spiral_escape(ctx, params.get(0) as f64, params.get(1) as f64, params.get(2) as f64),
        BorderHugger => border_hug(ctx, params.get(0) as f64, params.get(1) as f64),
        PerpendicularEscape => perpendicular_escape(ctx, params.get(0) as f64, params.get(1) as f64),
        DistanceKeeper => distance_keep(ctx, params.get(0) as f64, params.get(1) as f64, params.get(2) as f64),

        BoidsBehavior => boids(ctx, params.get(0) as f64, params.get(1) as f64, params.get(2) as f64, params.get(3) as f64),
        TightSchooler => cohere(ctx, params.get(0) as f64, params.get(1) as f64),
        LooseSchooler => cohere(ctx, params.get(0) as f64, params.get(1) as f64),
        EdgeFollowerSchool => cohere(ctx, params.get(0) as f64, params.get(1) as f64),
        PairBonder => cohere(ctx, params.get(0) as f64, params.get(1) as f64),
        LeaderFollower => cohere(ctx, params.get(0) as f64, params.get(1) as f64),
        DispersedGrouper => separate(ctx, params.get(0) as f64, params.get(1) as f64),
        MirrorSwimmer => mirror(ctx, params.get(0) as f64, params.get(1) as f64),

        RandomWalker => random_walk(params.get(0) as f64, params.get(1) as f64, rng),
        CuriousWanderer => curious_wander(ctx, params.get(0) as f64, params.get(1) as f64, rng),
        CornerExplorer => corner_explore(ctx, params.get(0) as f64, params.get(1) as f64),
        OpenWaterCruiser => open_water_cruise(ctx, params.get(0) as f64, params.get(1) as f64),
        NoveltySeeker => random_walk(params.get(0) as f64, params.get(1) as f64, rng),
        SpiralExplorer => spiral(ctx, params.get(0) as f64, params.get(1) as f64),
        ZigzagWanderer => zigzag(ctx, params.get(0) as f64, params.get(1) as f64),
        DriftExplorer => random_walk(params.get(0) as f64, params.get(1) as f64, rng),

        EnergyConserver | RestingDrifter | LazyHoverer | MetabolicThrottler | EfficientGlider
        | SlowCruiser => conserve_or_seek(ctx, params.get(0) as f64, params.get(1) as f64),
        BurstForager | EmergencyForager => burst_forage(ctx, params.get(0) as f64, params.get(1) as f64),

        VerticalPatrol => vertical_patrol(ctx, params.get(0) as f64, params.get(1) as f64),
        HorizontalPatrol => horizontal_patrol(ctx, params.get(0) as f64, params.get(1) as f64),
        PerimeterPatrol => perimeter_patrol(ctx, params.get(0) as f64, params.get(1) as f64),
        CastleGuard => orbit(ctx, params.get(0) as f64, params.get(1) as f64),
        TerritoryDefender => orbit(ctx, params.get(0) as f64, params.get(1) as f64),
        CornerSentinel => corner_explore(ctx, params.get(0) as f64, params.get(1) as f64),
        MidwaterPatrol => depth_band_patrol(ctx, params.get(0) as f64, 0.4, 0.6),
        DepthBandPatrol => depth_band_patrol(ctx, params.get(0) as f64, params.get(1) as f64, params.get(2) as f64),
    };
    clamp_magnitude(vx, vy)
}

fn clamp_magnitude(vx: f64, vy: f64) -> (f64, f64) {
    if !vx.is_finite() || !vy.is_finite() {
        return (0.0, 0.0);
    }
    let mag = (vx * vx + vy * vy).sqrt();
    if mag > MAX_MAGNITUDE && mag > 0.0 {
        let scale = MAX_MAGNITUDE / mag;
        (vx * scale, vy * scale)
    } else {
        (vx, vy)
    }
}

fn normalize(dx: f64, dy: f64) -> (f64, f64) {
    let len = (dx * dx + dy * dy).sqrt();
    if len > 1e-9 {
        (dx / len, dy / len)
    } else {
        (0.0, 0.0)
    }
}

fn away_from(n: Nearby, speed: f64) -> (f64, f64) {
    let (dx, dy) = normalize(-n.dx, -n.dy);
    (dx * speed, dy * speed)
}

fn toward(n: Nearby, speed: f64) -> (f64, f64) {
    let (dx, dy) = normalize(n.dx, n.dy);
    (dx * speed, dy * speed)
}

fn food_seek(ctx: &BehaviorContext, speed: f64, range: f64) -> (f64, f64) {
    if ctx.energy_ratio as f64 >= 0.9 {
        return (0.0, 0.0);
    }
    match ctx.nearest_food {
        Some(f) if f.distance <= range => toward(f, speed),
        _ => (0.0, 0.0),
    }
}

fn cautious_seek(ctx: &BehaviorContext, speed: f64, range: f64, caution: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < range * caution => away_from(p, speed),
        _ => food_seek(ctx, speed, range),
    }
}

/// Like `cautious_seek`, but falls back to the fish's own remembered food
/// location (rather than sitting idle) once no food is currently in
/// view — biases movement toward a spot that has paid off before, at a
/// reduced speed and over twice the immediate-food range since it's a
/// recollection, not a sighting.
fn memory_guided_seek(ctx: &BehaviorContext, speed: f64, range: f64, caution: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < range * caution => away_from(p, speed),
        _ => {
            if ctx.energy_ratio as f64 >= 0.9 {
                return (0.0, 0.0);
            }
            match ctx.nearest_food {
                Some(f) if f.distance <= range => toward(f, speed),
                _ => match ctx.remembered_food {
                    Some(m) if m.distance <= range * 2.0 => toward(m, speed * 0.6),
                    _ => (0.0, 0.0),
                },
            }
        }
    }
}

fn school_then_seek(ctx: &BehaviorContext, speed: f64, range: f64) -> (f64, f64) {
    if !ctx.nearby_same_species.is_empty() {
        cohere(ctx, speed, range)
    } else {
        food_seek(ctx, speed, range)
    }
}

fn flee_then_seek(ctx: &BehaviorContext, flee_speed: f64, panic_distance: f64, seek_speed: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < panic_distance => away_from(p, flee_speed),
        _ => food_seek(ctx, seek_speed, panic_distance),
    }
}

/// Freezes in place whenever a predator is within `freeze_distance`;
/// `resume_distance` is kept as a declared parameter (mutatable, part of
/// the genome) even though this stateless form of the behavior has no
/// hysteresis to apply it to.
fn freeze_response(ctx: &BehaviorContext, freeze_distance: f64, _resume_distance: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < freeze_distance => (0.0, 0.0),
        _ => (0.0, 0.0),
    }
}

fn erratic_evade<R: Rng + ?Sized>(ctx: &BehaviorContext, speed: f64, range: f64, rng: &mut R) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < range => {
            let (ax, ay) = away_from(p, speed);
            let jitter = 0.4;
            (
                ax + rng.random_range(-jitter..=jitter),
                ay + rng.random_range(-jitter..=jitter),
            )
        }
        _ => (0.0, 0.0),
    }
}

fn vertical_escape(ctx: &BehaviorContext, speed: f64, range: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < range => {
            let dir = if ctx.y > ctx.screen_h / 2.0 { -1.0 } else { 1.0 };
            (0.0, dir * speed)
        }
        _ => (0.0, 0.0),
    }
}

fn group_defend(ctx: &BehaviorContext, cohesion_range: f64, panic_distance: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < panic_distance => {
            let (mut vx, mut vy) = away_from(p, 0.8);
            let (cx, cy) = cohere(ctx, 0.5, cohesion_range);
            vx += cx;
            vy += cy;
            (vx, vy)
        }
        _ => (0.0, 0.0),
    }
}

fn spiral_escape(ctx: &BehaviorContext, speed: f64, range: f64, turn_rate: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < range => {
            let (ax, ay) = away_from(p, speed);
            let angle = turn_rate * (ctx.frame % 360) as f64 * std::f64::consts::PI / 180.0;
            (
                ax * angle.cos() - ay * angle.sin(),
                ax * angle.sin() + ay * angle.cos(),
            )
        }
        _ => (0.0, 0.0),
    }
}

fn border_hug(ctx: &BehaviorContext, speed: f64, range: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < range => {
            let to_left = ctx.x;
            let to_right = ctx.screen_w - ctx.x;
            if to_left < to_right {
                (-speed, 0.0)
            } else {
                (speed, 0.0)
            }
        }
        _ => (0.0, 0.0),
    }
}

fn perpendicular_escape(ctx: &BehaviorContext, speed: f64, range: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < range => {
            let (dx, dy) = normalize(p.dx, p.dy);
            (-dy * speed, dx * speed)
        }
        _ => (0.0, 0.0),
    }
}

fn distance_keep(ctx: &BehaviorContext, band_min: f64, band_max: f64, strafe: f64) -> (f64, f64) {
    match ctx.nearest_predator {
        Some(p) if p.distance < band_min => away_from(p, 0.9),
        Some(p) if p.distance < band_max => {
            let (dx, dy) = normalize(p.dx, p.dy);
            (-dy * strafe, dx * strafe)
        }
        _ => food_seek(ctx, 0.6, band_max),
    }
}

fn boids(ctx: &BehaviorContext, align_w: f64, cohere_w: f64, separate_w: f64, radius: f64) -> (f64, f64) {
    let mates: Vec<_> = ctx
        .nearby_same_species
        .iter()
        .filter(|m| (m.dx * m.dx + m.dy * m.dy).sqrt() <= radius)
        .collect();
    if mates.is_empty() {
        return (0.0, 0.0);
    }
    let n = mates.len() as f64;
    let (mut ax, mut ay) = (0.0, 0.0);
    let (mut cx, mut cy) = (0.0, 0.0);
    let (mut sx, mut sy) = (0.0, 0.0);
    for m in &mates {
        ax += m.vx;
        ay += m.vy;
        cx += m.dx;
        cy += m.dy;
        let dist = (m.dx * m.dx + m.dy * m.dy).sqrt().max(1e-6);
        sx -= m.dx / dist;
        sy -= m.dy / dist;
    }
    let (ax, ay) = normalize(ax / n, ay / n);
    let (cx, cy) = normalize(cx / n, cy / n);
    let (sx, sy) = normalize(sx / n, sy / n);
    (
        ax * align_w + cx * cohere_w + sx * separate_w,
        ay * align_w + cy * cohere_w + sy * separate_w,
    )
}

fn cohere(ctx: &BehaviorContext, speed: f64, radius: f64) -> (f64, f64) {
    boids(ctx, 0.2, speed, 0.3, radius)
}

fn separate(ctx: &BehaviorContext, speed: f64, radius: f64) -> (f64, f64) {
    boids(ctx, 0.0, 0.0, speed, radius)
}

fn mirror(ctx: &BehaviorContext, speed: f64, radius: f64) -> (f64, f64) {
    boids(ctx, speed, 0.0, 0.1, radius)
}

fn random_walk<R: Rng + ?Sized>(speed: f64, jitter: f64, rng: &mut R) -> (f64, f64) {
    (
        rng.random_range(-speed..=speed) + rng.random_range(-jitter..=jitter),
        rng.random_range(-speed..=speed) + rng.random_range(-jitter..=jitter),
    )
}

fn curious_wander<R: Rng + ?Sized>(ctx: &BehaviorContext, speed: f64, range: f64, rng: &mut R) -> (f64, f64) {
    match ctx.nearest_food {
        Some(f) if f.distance <= range => toward(f, speed),
        _ => random_walk(speed * 0.5, speed * 0.5, rng),
    }
}

fn corner_explore(ctx: &BehaviorContext, speed: f64, _margin: f64) -> (f64, f64) {
    let target_x = if ctx.x < ctx.screen_w / 2.0 { 0.0 } else { ctx.screen_w };
    let target_y = if ctx.y < ctx.screen_h / 2.0 { 0.0 } else { ctx.screen_h };
    let (dx, dy) = normalize(target_x - ctx.x, target_y - ctx.y);
    (dx * speed, dy * speed)
}

fn open_water_cruise(ctx: &BehaviorContext, speed: f64, _range: f64) -> (f64, f64) {
    let (dx, dy) = normalize(ctx.screen_w / 2.0 - ctx.x, ctx.screen_h / 2.0 - ctx.y);
    (dx * speed, dy * speed)
}

fn spiral(ctx: &BehaviorContext, speed: f64, turn_rate: f64) -> (f64, f64) {
    let angle = turn_rate * (ctx.frame % 360) as f64 * std::f64::consts::PI / 180.0;
    (speed * angle.cos(), speed * angle.sin())
}

fn zigzag(ctx: &BehaviorContext, speed: f64, period: f64) -> (f64, f64) {
    let phase = if period > 0.0 { (ctx.frame as f64 / period) as i64 % 2 } else { 0 };
    (speed, if phase == 0 { speed * 0.5 } else { -speed * 0.5 })
}

fn conserve_or_seek(ctx: &BehaviorContext, speed: f64, range: f64) -> (f64, f64) {
    if (ctx.energy_ratio as f64) > 0.6 {
        (0.0, 0.0)
    } else {
        food_seek(ctx, speed, range)
    }
}

fn burst_forage(ctx: &BehaviorContext, speed: f64, threshold: f64) -> (f64, f64) {
    if (ctx.energy_ratio as f64) < threshold {
        match ctx.nearest_food {
            Some(f) => toward(f, speed),
            None => (0.0, 0.0),
        }
    } else {
        (0.0, 0.0)
    }
}

fn vertical_patrol(ctx: &BehaviorContext, speed: f64, band: f64) -> (f64, f64) {
    let mid = ctx.screen_h / 2.0;
    let half = ctx.screen_h * band / 2.0;
    let dir = if ctx.y < mid - half {
        1.0
    } else if ctx.y > mid + half {
        -1.0
    } else if (ctx.frame / 180) % 2 == 0 {
        1.0
    } else {
        -1.0
    };
    (0.0, dir * speed)
}

fn horizontal_patrol(ctx: &BehaviorContext, speed: f64, band: f64) -> (f64, f64) {
    let mid = ctx.screen_w / 2.0;
    let half = ctx.screen_w * band / 2.0;
    let dir = if ctx.x < mid - half {
        1.0
    } else if ctx.x > mid + half {
        -1.0
    } else if (ctx.frame / 180) % 2 == 0 {
        1.0
    } else {
        -1.0
    };
    (dir * speed, 0.0)
}

fn perimeter_patrol(ctx: &BehaviorContext, speed: f64, margin: f64) -> (f64, f64) {
    let near_left = ctx.x < margin;
    let near_right = ctx.x > ctx.screen_w - margin;
    let near_top = ctx.y < margin;
    let near_bottom = ctx.y > ctx.screen_h - margin;
    if near_left && !near_top {
        (0.0, -speed)
    } else if near_top && !near_right {
        (speed, 0.0)
    } else if near_right && !near_bottom {
        (0.0, speed)
    } else if near_bottom {
        (-speed, 0.0)
    } else {
        let (dx, dy) = normalize(margin - ctx.x, margin - ctx.y);
        (dx * speed, dy * speed)
    }
}

fn orbit(ctx: &BehaviorContext, speed: f64, radius: f64) -> (f64, f64) {
    let cx = ctx.screen_w / 2.0;
    let cy = ctx.screen_h * 0.85;
    let dx = ctx.x - cx;
    let dy = ctx.y - cy;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist > radius {
        normalize(cx - ctx.x, cy - ctx.y)
    } else {
        let (tx, ty) = normalize(-dy, dx);
        (tx * speed, ty * speed)
    }
}

fn depth_band_patrol(ctx: &BehaviorContext, speed: f64, band_lo: f64, band_hi: f64) -> (f64, f64) {
    let lo = ctx.screen_h * band_lo;
    let hi = ctx.screen_h * band_hi;
    if ctx.y < lo {
        (0.0, speed)
    } else if ctx.y > hi {
        (0.0, -speed)
    } else {
        (speed * 0.3, 0.0)
    }
}
