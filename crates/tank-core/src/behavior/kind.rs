//! The ~50 algorithm identities, grouped by intent. Each variant's
//! `param_ranges` declares the bounds for up to five `f32` slots in
//! `BehaviorParams`; a slot with an empty range (`lo >= hi`) is unused by
//! that algorithm and never mutated.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum BehaviorFamily {
    FoodSeeking,
    PredatorAvoidance,
    Schooling,
    Exploration,
    EnergyManagement,
    Patrol,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub enum BehaviorKind {
    // --- food-seeking (8) ---
    DirectSeeker,
    CautiousApproacher,
    SchoolFollower,
    OpportunisticForager,
    MemoryGuidedForager,
    PatientWaiter,
    SurfaceSkimmer,
    BottomForager,

    // --- predator avoidance (10), grounded on the source's ten classes ---
    PanicFlee,
    StealthyAvoider,
    FreezeResponse,
    ErraticEvader,
    VerticalEscaper,
    GroupDefender,
    SpiralEscape,
    BorderHugger,
    PerpendicularEscape,
    DistanceKeeper,

    // --- schooling / cohesion (8) ---
    BoidsBehavior,
    TightSchooler,
    LooseSchooler,
    EdgeFollowerSchool,
    PairBonder,
    LeaderFollower,
    DispersedGrouper,
    MirrorSwimmer,

    // --- exploration (8) ---
    RandomWalker,
    CuriousWanderer,
    CornerExplorer,
    OpenWaterCruiser,
    NoveltySeeker,
    SpiralExplorer,
    ZigzagWanderer,
    DriftExplorer,

    // --- energy management (8) ---
    EnergyConserver,
    RestingDrifter,
    BurstForager,
    LazyHoverer,
    MetabolicThrottler,
    EfficientGlider,
    EmergencyForager,
    SlowCruiser,

    // --- specialized patrols (8) ---
    VerticalPatrol,
    HorizontalPatrol,
    PerimeterPatrol,
    CastleGuard,
    TerritoryDefender,
    CornerSentinel,
    MidwaterPatrol,
    DepthBandPatrol,
}

pub const ALL_KINDS: [BehaviorKind; 50] = [
    BehaviorKind::DirectSeeker,
    BehaviorKind::CautiousApproacher,
    BehaviorKind::SchoolFollower,
    BehaviorKind::OpportunisticForager,
    BehaviorKind::MemoryGuidedForager,
    BehaviorKind::PatientWaiter,
    BehaviorKind::SurfaceSkimmer,
    BehaviorKind::BottomForager,
    BehaviorKind::PanicFlee,
    BehaviorKind::StealthyAvoider,
    BehaviorKind::FreezeResponse,
    BehaviorKind::ErraticEvader,
    BehaviorKind::VerticalEscaper,
    BehaviorKind::GroupDefender,
    BehaviorKind::SpiralEscape,
    BehaviorKind::BorderHugger,
    BehaviorKind::PerpendicularEscape,
    BehaviorKind::DistanceKeeper,
    BehaviorKind::BoidsBehavior,
    BehaviorKind::TightSchooler,
    BehaviorKind::LooseSchooler,
    BehaviorKind::EdgeFollowerSchool,
    BehaviorKind::PairBonder,
    BehaviorKind::LeaderFollower,
    BehaviorKind::DispersedGrouper,
    BehaviorKind::MirrorSwimmer,
    BehaviorKind::RandomWalker,
    BehaviorKind::CuriousWanderer,
    BehaviorKind::CornerExplorer,
    BehaviorKind::OpenWaterCruiser,
    BehaviorKind::NoveltySeeker,
    BehaviorKind::SpiralExplorer,
    BehaviorKind::ZigzagWanderer,
    BehaviorKind::DriftExplorer,
    BehaviorKind::EnergyConserver,
    BehaviorKind::RestingDrifter,
    BehaviorKind::BurstForager,
    BehaviorKind::LazyHoverer,
    BehaviorKind::MetabolicThrottler,
    BehaviorKind::EfficientGlider,
    BehaviorKind::EmergencyForager,
    BehaviorKind::SlowCruiser,
    BehaviorKind::VerticalPatrol,
    BehaviorKind::HorizontalPatrol,
    BehaviorKind::PerimeterPatrol,
    BehaviorKind::CastleGuard,
    BehaviorKind::TerritoryDefender,
    BehaviorKind::CornerSentinel,
    BehaviorKind::MidwaterPatrol,
    BehaviorKind::DepthBandPatrol,
];

impl BehaviorKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        ALL_KINDS[rng.random_range(0..ALL_KINDS.len())]
    }

    pub fn family(self) -> BehaviorFamily {
        use BehaviorFamily::*;
        use BehaviorKind::*;
        match self {
            DirectSeeker | CautiousApproacher | SchoolFollower | OpportunisticForager
            | MemoryGuidedForager | PatientWaiter | SurfaceSkimmer | BottomForager => FoodSeeking,
            PanicFlee | StealthyAvoider | FreezeResponse | ErraticEvader | VerticalEscaper
            | GroupDefender | SpiralEscape | BorderHugger | PerpendicularEscape
            | DistanceKeeper => PredatorAvoidance,
            BoidsBehavior | TightSchooler | LooseSchooler | EdgeFollowerSchool | PairBonder
            | LeaderFollower | DispersedGrouper | MirrorSwimmer => Schooling,
            RandomWalker | CuriousWanderer | CornerExplorer | OpenWaterCruiser | NoveltySeeker
            | SpiralExplorer | ZigzagWanderer | DriftExplorer => Exploration,
            EnergyConserver | RestingDrifter | BurstForager | LazyHoverer | MetabolicThrottler
            | EfficientGlider | EmergencyForager | SlowCruiser => EnergyManagement,
            VerticalPatrol | HorizontalPatrol | PerimeterPatrol | CastleGuard
            | TerritoryDefender | CornerSentinel | MidwaterPatrol | DepthBandPatrol => Patrol,
        }
    }

    /// Declared `(min, max)` bounds for the five `BehaviorParams` slots.
    /// Slots past what an algorithm actually uses are left `(0.0, 0.0)`
    /// so `BehaviorParams::mutate` skips them.
    pub fn param_ranges(self) -> [(f32, f32); 5] {
        use BehaviorKind::*;
        let none = (0.0, 0.0);
        match self {
            // food-seeking: [approach_speed, detection_range, ...]
            DirectSeeker => [(0.5, 1.0), (100.0, 250.0), none, none, none],
            CautiousApproacher => [(0.3, 0.6), (80.0, 200.0), (0.2, 0.6), none, none],
            SchoolFollower => [(0.4, 0.8), (60.0, 180.0), none, none, none],
            OpportunisticForager => [(0.5, 0.9), (100.0, 220.0), (0.1, 0.5), none, none],
            MemoryGuidedForager => [(0.4, 0.8), (100.0, 200.0), (0.3, 0.9), none, none],
            PatientWaiter => [(0.2, 0.4), (60.0, 150.0), (30.0, 120.0), none, none],
            SurfaceSkimmer => [(0.4, 0.7), (80.0, 180.0), none, none, none],
            BottomForager => [(0.3, 0.6), (80.0, 180.0), none, none, none],

            // predator avoidance, grounded on predator_avoidance.py
            PanicFlee => [(1.2, 1.8), (100.0, 200.0), none, none, none],
            StealthyAvoider => [(0.3, 0.6), (150.0, 250.0), none, none, none],
            FreezeResponse => [(80.0, 150.0), (200.0, 300.0), none, none, none],
            ErraticEvader => [(0.8, 1.4), (100.0, 220.0), (0.2, 0.8), none, none],
            VerticalEscaper => [(0.6, 1.2), (100.0, 220.0), none, none, none],
            GroupDefender => [(40.0, 100.0), (120.0, 220.0), none, none, none],
            SpiralEscape => [(0.6, 1.2), (120.0, 220.0), (0.5, 2.0), none, none],
            BorderHugger => [(0.4, 0.9), (120.0, 220.0), none, none, none],
            PerpendicularEscape => [(0.6, 1.1), (100.0, 200.0), none, none, none],
            DistanceKeeper => [(60.0, 120.0), (140.0, 220.0), (0.3, 0.7), none, none],

            // schooling / cohesion
            BoidsBehavior => [(0.3, 0.8), (0.3, 0.8), (0.3, 0.8), (60.0, 140.0), none],
            TightSchooler => [(0.6, 1.0), (30.0, 70.0), none, none, none],
            LooseSchooler => [(0.2, 0.5), (80.0, 160.0), none, none, none],
            EdgeFollowerSchool => [(0.3, 0.6), (60.0, 140.0), none, none, none],
            PairBonder => [(0.4, 0.8), (20.0, 60.0), none, none, none],
            LeaderFollower => [(0.4, 0.9), (50.0, 120.0), none, none, none],
            DispersedGrouper => [(0.2, 0.5), (100.0, 200.0), none, none, none],
            MirrorSwimmer => [(0.3, 0.7), (40.0, 100.0), none, none, none],

            // exploration
            RandomWalker => [(0.2, 0.6), (0.1, 0.5), none, none, none],
            CuriousWanderer => [(0.3, 0.6), (100.0, 200.0), none, none, none],
            CornerExplorer => [(0.3, 0.6), (40.0, 100.0), none, none, none],
            OpenWaterCruiser => [(0.4, 0.8), (150.0, 300.0), none, none, none],
            NoveltySeeker => [(0.3, 0.7), (0.2, 0.6), none, none, none],
            SpiralExplorer => [(0.3, 0.6), (0.5, 1.5), none, none, none],
            ZigzagWanderer => [(0.4, 0.8), (20.0, 60.0), none, none, none],
            DriftExplorer => [(0.1, 0.3), (0.0, 0.3), none, none, none],

            // energy management
            EnergyConserver => [(0.1, 0.3), (0.3, 0.5), none, none, none],
            RestingDrifter => [(0.05, 0.15), (0.2, 0.4), none, none, none],
            BurstForager => [(0.8, 1.3), (0.4, 0.6), (20.0, 60.0), none, none],
            LazyHoverer => [(0.05, 0.2), none, none, none, none],
            MetabolicThrottler => [(0.2, 0.5), (0.3, 0.6), none, none, none],
            EfficientGlider => [(0.2, 0.4), (100.0, 200.0), none, none, none],
            EmergencyForager => [(0.6, 1.0), (0.2, 0.4), none, none, none],
            SlowCruiser => [(0.2, 0.4), (150.0, 250.0), none, none, none],

            // patrols
            VerticalPatrol => [(0.3, 0.6), (0.2, 0.4), none, none, none],
            HorizontalPatrol => [(0.3, 0.6), (0.2, 0.4), none, none, none],
            PerimeterPatrol => [(0.3, 0.6), (30.0, 70.0), none, none, none],
            CastleGuard => [(0.3, 0.6), (40.0, 100.0), none, none, none],
            TerritoryDefender => [(0.4, 0.8), (60.0, 140.0), none, none, none],
            CornerSentinel => [(0.3, 0.6), (40.0, 90.0), none, none, none],
            MidwaterPatrol => [(0.3, 0.6), (0.3, 0.6), none, none, none],
            DepthBandPatrol => [(0.3, 0.6), (0.3, 0.5), (0.5, 0.8), none, none],
        }
    }
}
