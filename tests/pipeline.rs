//! End-to-end scenarios for the level-detection pipeline, on fixed
//! synthetic traces.

use photolevels::prelude::*;

/// 100 i.i.d. Gaussian samples, mean 5.0, sigma 0.1: one flat level.
const FLAT_TRACE: [f64; 100] = [
    5.094171540468066,
    4.860342189529885,
    4.932028555192158,
    5.037050356746066,
    4.898365110581193,
    4.992787997721493,
    5.017919648727486,
    4.9168900784729015,
    4.869096263554064,
    5.01938877412491,
    5.0993249703535195,
    4.93530183694525,
    4.966633201620433,
    5.164567176058267,
    4.944111023415173,
    4.948584333694727,
    5.240411933229857,
    4.846891740712637,
    5.079646584029355,
    4.799635148284859,
    4.94030372519143,
    5.150368088248194,
    5.122143641307667,
    4.909887984960462,
    4.954630126987539,
    5.008023304241061,
    4.874189670227553,
    5.0552220005061,
    5.2227577292070215,
    4.864475850644873,
    4.801846692044672,
    5.028824374558107,
    4.988087668891542,
    5.180432993191954,
    4.983963782094299,
    4.994934028635128,
    4.980912611039874,
    4.90093937616517,
    5.067302998402538,
    4.867591753552798,
    5.116649013823853,
    5.0008376179502045,
    5.05036300563785,
    4.94472353028793,
    4.907980633216646,
    5.18002633604413,
    5.046854978225278,
    5.120700317936534,
    5.018712289779981,
    5.261160752725605,
    5.035750004836442,
    4.89701951954636,
    5.076850909695419,
    5.042529911585764,
    4.767885002650744,
    4.988409577093871,
    5.098019902118402,
    5.080116504011677,
    4.966056459168701,
    4.87873757849528,
    5.049129354930743,
    4.885417205416129,
    5.132467866241045,
    4.96937324534033,
    4.907518099652581,
    4.9432334080006335,
    4.918911118693498,
    4.943928268751572,
    4.926361589619593,
    4.962099147663294,
    5.023896969923651,
    5.059688907279685,
    4.888975672547238,
    4.904846206043403,
    4.957084749069855,
    5.0063745592791555,
    5.0097729371729,
    4.795601847113057,
    5.170402735069375,
    4.910980598164768,
    5.181698886163059,
    4.864774498259326,
    4.903582834888643,
    4.974856504521503,
    4.977732488669511,
    4.922842167746877,
    5.07348951912399,
    4.819796588627643,
    5.105505772980503,
    4.918202700290134,
    5.12515996545255,
    4.959128538382073,
    4.86009434481772,
    5.044911469839111,
    5.223017100751449,
    4.994755301774982,
    5.0111484935280775,
    4.960062591282406,
    4.912347176492168,
    4.924867354646686,
];

/// 50 samples at mean 2.0 then 50 at mean 1.0, sigma 0.1 each: two
/// levels with a step at index 50.
const STEP_TRACE: [f64; 100] = [
    2.0941715404680665,
    1.860342189529885,
    1.9320285551921579,
    2.037050356746066,
    1.898365110581193,
    1.9927879977214928,
    2.0179196487274855,
    1.9168900784729013,
    1.8690962635540642,
    2.0193887741249106,
    2.0993249703535195,
    1.9353018369452495,
    1.966633201620433,
    2.164567176058268,
    1.9441110234151728,
    1.9485843336947273,
    2.240411933229857,
    1.846891740712637,
    2.079646584029355,
    1.7996351482848596,
    1.9403037251914297,
    2.150368088248194,
    2.1221436413076673,
    1.9098879849604615,
    1.9546301269875384,
    2.0080233042410613,
    1.8741896702275533,
    2.0552220005061,
    2.222757729207022,
    1.8644758506448733,
    1.8018466920446716,
    2.0288243745581074,
    1.9880876688915428,
    2.180432993191954,
    1.983963782094299,
    1.9949340286351278,
    1.980912611039874,
    1.9009393761651698,
    2.0673029984025386,
    1.8675917535527977,
    2.1166490138238534,
    2.0008376179502045,
    2.0503630056378506,
    1.9447235302879293,
    1.907980633216646,
    2.18002633604413,
    2.046854978225278,
    2.1207003179365347,
    2.0187122897799807,
    2.261160752725605,
    1.0357500048364412,
    0.8970195195463603,
    1.0768509096954189,
    1.0425299115857647,
    0.7678850026507441,
    0.9884095770938712,
    1.098019902118402,
    1.0801165040116771,
    0.9660564591687011,
    0.8787375784952802,
    1.0491293549307428,
    0.8854172054161284,
    1.1324678662410457,
    0.9693732453403306,
    0.9075180996525807,
    0.9432334080006334,
    0.9189111186934984,
    0.9439282687515721,
    0.9263615896195929,
    0.9620991476632947,
    1.023896969923651,
    1.0596889072796845,
    0.888975672547238,
    0.9048462060434027,
    0.9570847490698546,
    1.0063745592791558,
    1.0097729371729,
    0.7956018471130563,
    1.1704027350693749,
    0.910980598164768,
    1.1816988861630593,
    0.8647744982593262,
    0.9035828348886423,
    0.9748565045215026,
    0.9777324886695109,
    0.9228421677468769,
    1.0734895191239904,
    0.8197965886276432,
    1.1055057729805025,
    0.9182027002901347,
    1.1251599654525501,
    0.9591285383820726,
    0.8600943448177201,
    1.044911469839111,
    1.2230171007514494,
    0.9947553017749826,
    1.0111484935280772,
    0.9600625912824062,
    0.912347176492168,
    0.9248673546466862,
];

/// 60 flat samples at mean 3.0, sigma 0.05, with one sample spiked to
/// 30.0 at index 30.
const SPIKE_TRACE: [f64; 60] = [
    3.047085770234033,
    2.9301710947649426,
    2.966014277596079,
    3.018525178373033,
    2.9491825552905966,
    2.9963939988607464,
    3.008959824363743,
    2.9584450392364507,
    2.934548131777032,
    3.009694387062455,
    3.0496624851767598,
    2.967650918472625,
    2.9833166008102165,
    3.0822835880291337,
    2.9720555117075866,
    2.9742921668473636,
    3.1202059666149284,
    2.9234458703563186,
    3.0398232920146775,
    2.8998175741424297,
    2.970151862595715,
    3.075184044124097,
    3.0610718206538334,
    2.954943992480231,
    2.9773150634937693,
    3.0040116521205307,
    2.9370948351137764,
    3.02761100025305,
    3.1113788646035108,
    2.9322379253224367,
    30.0,
    3.0144121872790537,
    2.994043834445771,
    3.090216496595977,
    2.9919818910471494,
    2.997467014317564,
    2.990456305519937,
    2.950469688082585,
    3.033651499201269,
    2.933795876776399,
    3.0583245069119265,
    3.0004188089751023,
    3.025181502818925,
    2.972361765143965,
    2.953990316608323,
    3.090013168022065,
    3.023427489112639,
    3.060350158968267,
    3.0093561448899906,
    3.1305803763628024,
    3.017875002418221,
    2.94850975977318,
    3.0384254548477094,
    3.021264955792882,
    2.883942501325372,
    2.9942047885469356,
    3.049009951059201,
    3.0400582520058386,
    2.9830282295843507,
    2.93936878924764,
];

fn init_logging() {
    let _ = pretty_env_logger::try_init();
}

#[test]
fn flat_trace_is_one_level() {
    init_logging();
    let detection =
        detect_levels(&FLAT_TRACE, &LevelConfig::default()).unwrap();
    assert_eq!(detection.segments(), &vec![Segment::new(0, 100)]);
    assert_eq!(detection.n_levels(), 1);
    assert_eq!(detection.groups()[0].n_samples(), 100);

    let summaries = detection.summaries(&FLAT_TRACE).unwrap();
    assert_eq!(summaries.len(), 1);
    assert!((summaries[0].mean - 5.0).abs() < 0.05);
    assert!(summaries[0].std_dev < 0.15);
}

#[test]
fn step_trace_is_two_levels() {
    init_logging();
    let detection =
        detect_levels(&STEP_TRACE, &LevelConfig::default()).unwrap();
    assert_eq!(
        detection.segments(),
        &vec![Segment::new(0, 50), Segment::new(50, 100)]
    );
    assert_eq!(detection.n_levels(), 2);
    // groups keep left-to-right order: the brighter level comes first
    let summaries = detection.summaries(&STEP_TRACE).unwrap();
    assert!((summaries[0].mean - 2.0).abs() < 0.05);
    assert!((summaries[1].mean - 1.0).abs() < 0.05);
}

#[test]
fn short_trace_yields_no_levels() {
    init_logging();
    let detection =
        detect_levels(&[4.9, 5.1, 5.0], &LevelConfig::default()).unwrap();
    assert!(detection.is_empty());
    assert!(detection.segments().is_empty());
}

#[test]
fn spiked_sample_is_excluded_from_all_levels() {
    init_logging();
    let detection =
        detect_levels(&SPIKE_TRACE, &LevelConfig::default()).unwrap();
    assert_eq!(detection.segments().len(), 2);
    assert!(detection.groups().iter().all(|g| !g.contains(30)));
    // both flanks sit at the same intensity, so they share one level
    assert_eq!(detection.n_levels(), 1);
}

#[test]
fn splitter_cuts_out_the_spike() {
    // drive the splitter directly across the contaminated region
    let config = LevelConfig::default();
    let whole = vec![Segment::new(0, 60)];
    let split = segment_split(&whole, &SPIKE_TRACE, &config).unwrap();
    assert_eq!(split, vec![Segment::new(0, 30), Segment::new(31, 60)]);
    let kept = segment_filter(&split, &SPIKE_TRACE, &config).unwrap();
    assert_eq!(kept, split);
}

#[test]
fn pipeline_is_deterministic() {
    init_logging();
    let config = LevelConfig::default();
    let first = detect_levels(&STEP_TRACE, &config).unwrap();
    let second = detect_levels(&STEP_TRACE, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn groups_partition_the_validated_segments() {
    init_logging();
    let detection =
        detect_levels(&STEP_TRACE, &LevelConfig::default()).unwrap();

    let mut grouped = detection
        .groups()
        .iter()
        .flat_map(|g| g.segments().iter().copied())
        .collect::<Vec<_>>();
    grouped.sort();
    assert_eq!(&grouped, detection.segments());

    // no sample index belongs to two groups
    for index in 0..STEP_TRACE.len() {
        let owners = detection
            .groups()
            .iter()
            .filter(|g| g.contains(index))
            .count();
        assert!(owners <= 1, "index {} owned by {} groups", index, owners);
    }
}

#[test]
fn stagewise_invariants_hold() {
    init_logging();
    let config = LevelConfig::default();

    let candidates = segment_detect(&STEP_TRACE, &config).unwrap();
    assert!(is_sorted_disjoint(&candidates));

    let merged = segment_merge(&candidates, &STEP_TRACE, &config).unwrap();
    assert!(is_sorted_disjoint(&merged));
    assert!(merged.len() <= candidates.len());

    let extended = segment_extend(&merged, &STEP_TRACE, &config).unwrap();
    assert!(is_sorted_disjoint(&extended));
    assert_eq!(extended.len(), merged.len());
    for (before, after) in merged.iter().zip(extended.iter()) {
        assert!(after.start() <= before.start());
        assert!(after.end() >= before.end());
    }
}

#[test]
fn regrouping_the_groups_changes_nothing() {
    init_logging();
    let config = LevelConfig::default();
    let detection = detect_levels(&STEP_TRACE, &config).unwrap();

    let segments = detection.segments().clone();
    let regrouped = group_levels(&segments, &STEP_TRACE, &config).unwrap();
    assert_eq!(&regrouped, detection.groups());

    // distinct groups are not KS-compatible with each other
    for (i, left) in detection.groups().iter().enumerate() {
        for right in detection.groups().iter().skip(i + 1) {
            let p = ks_test_two_sample(
                &left.samples(&STEP_TRACE),
                &right.samples(&STEP_TRACE),
            )
            .unwrap();
            assert!(p <= config.significance_level, "p = {}", p);
        }
    }
}

#[test]
fn batch_isolates_failures() {
    init_logging();
    let poisoned = vec![5.0, f64::NAN, 5.1, 4.9, 5.0, 5.05];
    let traces =
        vec![FLAT_TRACE.to_vec(), poisoned, STEP_TRACE.to_vec()];
    let results = detect_levels_batch(&traces, &LevelConfig::default());

    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
    assert_eq!(results[2].as_ref().unwrap().n_levels(), 2);
}

#[test]
fn random_traces_keep_structural_invariants() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    init_logging();
    let config = LevelConfig::default();
    let normal = Normal::new(4.0, 0.2).unwrap();

    for seed in 0..8u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let trace = (0..200)
            .map(|_| normal.sample(&mut rng))
            .collect::<Vec<f64>>();
        let detection = detect_levels(&trace, &config).unwrap();

        assert!(is_sorted_disjoint(detection.segments()));
        let mut grouped = detection
            .groups()
            .iter()
            .flat_map(|g| g.segments().iter().copied())
            .collect::<Vec<_>>();
        grouped.sort();
        assert_eq!(&grouped, detection.segments());
        for segment in detection.segments() {
            assert!(segment.len() > config.min_level_length);
            assert!(segment.end() <= trace.len());
        }
    }
}

#[test]
fn serde_round_trip_of_detection() {
    let detection =
        detect_levels(&STEP_TRACE, &LevelConfig::default()).unwrap();
    let json = serde_json::to_string(&detection).unwrap();
    let back: LevelDetection = serde_json::from_str(&json).unwrap();
    assert_eq!(detection, back);
}
