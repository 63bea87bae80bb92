use cranelift_codegen::settings::{self, Configurable};
use cranelift_codegen::verify_function;
use marrow_props::{BaseType, Param, Signature, Value};
use marrow_synth::Fragment;

use crate::{compile_candidate, CandidateCompiler, CompiledCandidate};

fn float_kernel_signature() -> Signature {
    Signature {
        name: "f".to_string(),
        return_type: Some(BaseType::Integer),
        parameters: vec![
            Param {
                name: "size".to_string(),
                base: BaseType::Integer,
                pointer_depth: 0,
            },
            Param {
                name: "a".to_string(),
                base: BaseType::Floating,
                pointer_depth: 1,
            },
            Param {
                name: "b".to_string(),
                base: BaseType::Floating,
                pointer_depth: 1,
            },
        ],
    }
}

fn verify(candidate: &CompiledCandidate) {
    let mut flag_builder = settings::builder();
    flag_builder.set("use_colocated_libcalls", "false").unwrap();
    let flags = settings::Flags::new(flag_builder);
    if let Err(errors) = verify_function(&candidate.function, &flags) {
        panic!("invalid function:\n{}\n{}", candidate.function.display(), errors);
    }
}

#[test]
fn empty_fragment_compiles_to_a_straight_jump() {
    let signature = float_kernel_signature();
    let candidate = compile_candidate(&Fragment::Empty, &signature).unwrap();
    verify(&candidate);
    assert!(candidate.metadata.seeds.is_empty());
    assert!(candidate.metadata.data_blocks.is_empty());
    assert!(candidate.metadata.outputs.is_empty());
}

#[test]
fn linear_fragment_produces_one_data_region_with_its_seeds() {
    let signature = float_kernel_signature();
    let candidate = compile_candidate(&Fragment::linear(3), &signature).unwrap();
    verify(&candidate);
    assert_eq!(candidate.metadata.seeds.len(), 3);
    assert_eq!(candidate.metadata.data_blocks.len(), 1);
}

#[test]
fn regular_loop_loads_one_seed_per_pointer() {
    let signature = float_kernel_signature();
    let fragment = Fragment::regular_loop(
        Value::param("size"),
        vec![Value::param("a"), Value::param("b")],
    );
    let candidate = compile_candidate(&fragment, &signature).unwrap();
    verify(&candidate);
    assert_eq!(candidate.metadata.seeds.len(), 2);
    assert!(candidate.metadata.outputs.is_empty());
    assert!(candidate.metadata.indices.is_empty());
}

#[test]
fn output_loop_records_element_addresses_instead_of_loading() {
    let signature = float_kernel_signature();
    let fragment = Fragment::output_loop(Value::param("size"), Value::param("b"));
    let candidate = compile_candidate(&fragment, &signature).unwrap();
    verify(&candidate);
    assert!(candidate.metadata.seeds.is_empty());
    assert_eq!(candidate.metadata.outputs.len(), 1);
}

#[test]
fn filled_loop_body_contributes_its_own_seeds() {
    let signature = float_kernel_signature();
    let mut fragment = Fragment::regular_loop(Value::param("size"), vec![Value::param("a")]);
    fragment
        .add_child(Fragment::linear(2), 1)
        .expect("loop body hole accepts a child");
    let candidate = compile_candidate(&fragment, &signature).unwrap();
    verify(&candidate);
    // One load for the pointer, two linear seeds.
    assert_eq!(candidate.metadata.seeds.len(), 3);
    assert_eq!(candidate.metadata.data_blocks.len(), 1);
}

#[test]
fn nested_loops_verify() {
    let signature = float_kernel_signature();
    let mut outer = Fragment::loop_to_n(Value::param("size"));
    outer
        .add_child(
            Fragment::regular_loop(Value::param("size"), vec![Value::param("b")]),
            1,
        )
        .expect("loop body hole accepts a child");
    let candidate = compile_candidate(&outer, &signature).unwrap();
    verify(&candidate);
    assert_eq!(candidate.metadata.seeds.len(), 1);
    assert!(candidate.metadata.indices.is_empty());
}

#[test]
fn loop_bound_may_be_a_literal() {
    let signature = float_kernel_signature();
    let candidate = compile_candidate(&Fragment::loop_to_n(Value::Int(4)), &signature).unwrap();
    verify(&candidate);
}

#[test]
#[should_panic(expected = "no parameter named 'c'")]
fn unknown_parameter_reference_panics() {
    let signature = float_kernel_signature();
    let fragment = Fragment::regular_loop(Value::param("size"), vec![Value::param("c")]);
    let _ = compile_candidate(&fragment, &signature);
}

#[test]
fn object_emission_produces_bytes() {
    let signature = float_kernel_signature();
    let fragment = Fragment::regular_loop(Value::param("size"), vec![Value::param("a")]);
    let candidate = compile_candidate(&fragment, &signature).unwrap();

    let mut compiler = CandidateCompiler::new(None).unwrap();
    compiler.define_candidate("candidate_0", &candidate).unwrap();
    let bytes = compiler.finish().unwrap();
    assert!(!bytes.is_empty());
}
