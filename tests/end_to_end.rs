// Text in, number out, through the public API only.
// Run with: cargo test --test end_to_end

use gate_network::{
    AdderAudit, Error, ResolveError, Resolver, Strategy, assemble, bits, evaluate, parse,
};

const SMALL: &str = "\
x00: 1
x01: 1
x02: 1
y00: 0
y01: 1
y02: 0

x00 AND y00 -> z00
x01 XOR y01 -> z01
x02 OR y02 -> z02
";

const LARGE: &str = "\
x00: 1
x01: 0
x02: 1
x03: 1
x04: 0
y00: 1
y01: 1
y02: 1
y03: 1
y04: 1

ntg XOR fgs -> mjb
y02 OR x01 -> tnw
kwq OR kpj -> z05
x00 OR x03 -> fst
tgd XOR rvg -> z01
vdt OR tnw -> bfw
bfw AND frj -> z10
ffh OR nrd -> bqk
y00 AND y03 -> djm
y03 OR y00 -> psh
bqk OR frj -> z08
tnw OR fst -> frj
gnj AND tgd -> z11
bfw XOR mjb -> z00
x03 OR x00 -> vdt
gnj AND wpb -> z02
x04 AND y00 -> kjc
djm OR pbm -> qhw
nrd AND vdt -> hwm
kjc AND fst -> rvg
y04 OR y02 -> fgs
y01 AND x02 -> pbm
ntg OR kjc -> kwq
psh XOR fgs -> tgd
qhw XOR tgd -> z09
pbm OR djm -> kpj
x03 XOR y03 -> ffh
x00 XOR y04 -> ntg
bfw OR bqk -> z06
nrd XOR fgs -> wpb
frj XOR qhw -> z04
bqk OR frj -> z07
y03 OR x01 -> nrd
hwm AND bqk -> z03
tgd XOR rvg -> z12
tnw OR pbm -> gnj
";

#[test]
fn small_network() {
    for strategy in Strategy::ALL {
        assert_eq!(evaluate(SMALL, "z", strategy).unwrap(), 4, "{strategy}");
    }
}

#[test_log::test]
fn large_network() {
    let (network, report) = parse(LARGE).unwrap();
    assert_eq!(report.assignments, 10);
    assert_eq!(report.gates, 36);
    assert!(report.skipped.is_empty());

    for strategy in Strategy::ALL {
        let resolved = Resolver::new(network.clone())
            .with_strategy(strategy)
            .resolve()
            .unwrap();

        assert_eq!(resolved.stats().applied, 36, "{strategy}");
        assert_eq!(bits(&resolved, "z").unwrap(), "0011111101000");
        assert_eq!(assemble(&resolved, "z").unwrap(), 2024);
    }
}

#[test]
fn other_prefixes_read_the_inputs() {
    let (network, _) = parse(LARGE).unwrap();
    let resolved = Resolver::new(network).resolve().unwrap();

    // x04..x00 = 01101, y04..y00 = 11111
    assert_eq!(assemble(&resolved, "x").unwrap(), 0b01101);
    assert_eq!(assemble(&resolved, "y").unwrap(), 0b11111);
}

#[test]
fn resolved_network_as_json() {
    let (network, _) = parse(SMALL).unwrap();
    let resolved = Resolver::new(network)
        .with_strategy(Strategy::Topological)
        .resolve()
        .unwrap();

    let json = serde_json::to_value(&resolved).unwrap();
    assert_eq!(json["wires"]["z00"], false);
    assert_eq!(json["wires"]["z01"], false);
    assert_eq!(json["wires"]["z02"], true);
    assert_eq!(json["stats"]["strategy"], "topological");
    assert_eq!(json["stats"]["applied"], 3);
}

#[test]
fn cycle_is_reported_not_looped() {
    let input = "x: 1\nx AND b -> a\nx OR a -> b\nx XOR x -> z00\n";

    for strategy in Strategy::ALL {
        match evaluate(input, "z", strategy) {
            Err(Error::Resolve(ResolveError::UnresolvableNetwork { pending, unknown })) => {
                assert_eq!(pending, vec!["x AND b -> a", "x OR a -> b"], "{strategy}");
                assert_eq!(unknown, vec!["a", "b"], "{strategy}");
            }
            other => panic!("{strategy}: expected an unresolvable network, got {other:?}"),
        }
    }
}

#[test]
fn missing_output_prefix() {
    let err = evaluate(SMALL, "out", Strategy::Worklist).unwrap_err();
    assert_eq!(err.to_string(), "No wire name starts with \"out\"");
}

#[test]
fn small_network_is_not_an_adder() {
    let (network, _) = parse(SMALL).unwrap();
    let audit = AdderAudit::run(&network, Strategy::Worklist).unwrap();

    assert_eq!(audit.width, 3);
    assert!(!audit.is_correct());
    assert_eq!(audit.first_failing_bit(), Some(0));
}
