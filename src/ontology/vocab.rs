//! # 本体词汇表
//!
//! 固定命名空间与 "概念 -> (谓词, 宾语类型)" 映射表。
//! 新增映射只需在 `Concept` 中加一项并补充 `Concept::mapping`。
//!
//! ## 依赖关系
//! - 被 `ontology/mapper.rs`, `ontology/turtle.rs`, `query/` 使用

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
pub const ONTOCOMPCHEM: &str = "http://www.theworldavatar.com/ontology/ontocompchem/ontocompchem.owl#";
pub const CHEMINF: &str = "http://semanticscience.org/resource/";
pub const PROV: &str = "http://www.w3.org/ns/prov#";
pub const DCTERMS: &str = "http://purl.org/dc/terms/";

/// 序列化时的固定前缀顺序（实例前缀 `kg` 由配置追加）
pub const PREFIXES: [(&str, &str); 7] = [
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("xsd", XSD),
    ("ontocompchem", ONTOCOMPCHEM),
    ("cheminf", CHEMINF),
    ("prov", PROV),
    ("dcterms", DCTERMS),
];

macro_rules! iri {
    (rdf: $local:literal) => {
        concat!("http://www.w3.org/1999/02/22-rdf-syntax-ns#", $local)
    };
    (rdfs: $local:literal) => {
        concat!("http://www.w3.org/2000/01/rdf-schema#", $local)
    };
    (xsd: $local:literal) => {
        concat!("http://www.w3.org/2001/XMLSchema#", $local)
    };
    (occ: $local:literal) => {
        concat!(
            "http://www.theworldavatar.com/ontology/ontocompchem/ontocompchem.owl#",
            $local
        )
    };
    (cheminf: $local:literal) => {
        concat!("http://semanticscience.org/resource/", $local)
    };
    (prov: $local:literal) => {
        concat!("http://www.w3.org/ns/prov#", $local)
    };
    (dcterms: $local:literal) => {
        concat!("http://purl.org/dc/terms/", $local)
    };
}

// 数据类型
pub const XSD_DOUBLE: &str = iri!(xsd: "double");
pub const XSD_INTEGER: &str = iri!(xsd: "integer");
pub const XSD_BOOLEAN: &str = iri!(xsd: "boolean");
pub const XSD_DATE_TIME: &str = iri!(xsd: "dateTime");

// 谓词
pub const RDF_TYPE: &str = iri!(rdf: "type");
pub const RDFS_LABEL: &str = iri!(rdfs: "label");
pub const DCTERMS_IDENTIFIER: &str = iri!(dcterms: "identifier");
pub const DCTERMS_DATE: &str = iri!(dcterms: "date");
pub const PROV_WAS_DERIVED_FROM: &str = iri!(prov: "wasDerivedFrom");
pub const PROV_WAS_GENERATED_BY: &str = iri!(prov: "wasGeneratedBy");
pub const PROV_GENERATED_AT_TIME: &str = iri!(prov: "generatedAtTime");
pub const HAS_PROGRAM: &str = iri!(occ: "hasProgram");
pub const HAS_PROGRAM_VERSION: &str = iri!(occ: "hasProgramVersion");
pub const HAS_CONVERGENCE: &str = iri!(occ: "hasConvergence");
pub const HAS_TERMINATION_STATUS: &str = iri!(occ: "hasTerminationStatus");
pub const HAS_COMPUTATIONAL_METHOD: &str = iri!(occ: "hasComputationalMethod");
pub const HAS_BASIS_SET: &str = iri!(occ: "hasBasisSet");
pub const HAS_CHARGE: &str = iri!(occ: "hasCharge");
pub const HAS_SPIN_MULTIPLICITY: &str = iri!(occ: "hasSpinMultiplicity");
pub const HAS_MOLECULAR_STRUCTURE: &str = iri!(occ: "hasMolecularStructure");
pub const HAS_MOLECULAR_FORMULA: &str = iri!(occ: "hasMolecularFormula");
pub const HAS_ATOM: &str = iri!(cheminf: "hasAtom");
pub const HAS_INDEX: &str = iri!(occ: "hasIndex");
pub const HAS_ELEMENT: &str = iri!(occ: "hasElement");
pub const HAS_ATOMIC_NUMBER: &str = iri!(occ: "hasAtomicNumber");
pub const HAS_X_COORDINATE: &str = iri!(occ: "hasXCoordinate");
pub const HAS_Y_COORDINATE: &str = iri!(occ: "hasYCoordinate");
pub const HAS_Z_COORDINATE: &str = iri!(occ: "hasZCoordinate");
pub const HAS_SCF_ENERGY: &str = iri!(occ: "hasSCFEnergy");
pub const HAS_HOMO_LUMO_GAP: &str = iri!(occ: "hasHOMOLUMOGap");
pub const HAS_VALUE: &str = iri!(occ: "hasValue");
pub const HAS_UNIT: &str = iri!(occ: "hasUnit");
pub const HAS_VIBRATIONAL_FREQUENCIES: &str = iri!(occ: "hasVibrationalFrequencies");
pub const HAS_FREQUENCY: &str = iri!(occ: "hasFrequency");

// 类
pub const CALCULATION: &str = iri!(occ: "G16Calculation");
pub const COMPUTATIONAL_METHOD: &str = iri!(occ: "ComputationalMethod");
pub const BASIS_SET: &str = iri!(occ: "BasisSet");
pub const MOLECULAR_STRUCTURE: &str = iri!(occ: "MolecularStructure");
pub const ATOM: &str = iri!(occ: "Atom");
pub const SCF_ENERGY: &str = iri!(occ: "ScfEnergy");
pub const HOMO_LUMO_GAP: &str = iri!(occ: "HomoLumoEnergyGap");
pub const VIBRATIONAL_ANALYSIS: &str = iri!(occ: "VibrationalAnalysis");
pub const FREQUENCY: &str = iri!(occ: "Frequency");

/// 宾语类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// 指向另一个节点（IRI）
    Node,
    /// 纯字符串字面量
    Plain,
    /// 带数据类型的字面量
    Typed(&'static str),
}

/// 可映射的概念
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concept {
    Type,
    Label,
    Identifier,
    Program,
    ProgramVersion,
    RunDate,
    Convergence,
    Termination,
    DerivedFrom,
    GeneratedBy,
    GeneratedAt,
    Method,
    BasisSet,
    Charge,
    Multiplicity,
    Structure,
    Formula,
    Atom,
    Index,
    Element,
    AtomicNumber,
    X,
    Y,
    Z,
    ScfEnergy,
    HomoLumoGap,
    Value,
    Unit,
    Vibrations,
    Frequency,
}

impl Concept {
    /// 概念 -> (谓词, 宾语类型)
    pub const fn mapping(self) -> (&'static str, ObjectKind) {
        use ObjectKind::*;
        match self {
            Concept::Type => (RDF_TYPE, Node),
            Concept::Label => (RDFS_LABEL, Plain),
            Concept::Identifier => (DCTERMS_IDENTIFIER, Plain),
            Concept::Program => (HAS_PROGRAM, Plain),
            Concept::ProgramVersion => (HAS_PROGRAM_VERSION, Plain),
            Concept::RunDate => (DCTERMS_DATE, Typed(XSD_DATE_TIME)),
            Concept::Convergence => (HAS_CONVERGENCE, Typed(XSD_BOOLEAN)),
            Concept::Termination => (HAS_TERMINATION_STATUS, Plain),
            Concept::DerivedFrom => (PROV_WAS_DERIVED_FROM, Plain),
            Concept::GeneratedBy => (PROV_WAS_GENERATED_BY, Plain),
            Concept::GeneratedAt => (PROV_GENERATED_AT_TIME, Typed(XSD_DATE_TIME)),
            Concept::Method => (HAS_COMPUTATIONAL_METHOD, Node),
            Concept::BasisSet => (HAS_BASIS_SET, Node),
            Concept::Charge => (HAS_CHARGE, Typed(XSD_INTEGER)),
            Concept::Multiplicity => (HAS_SPIN_MULTIPLICITY, Typed(XSD_INTEGER)),
            Concept::Structure => (HAS_MOLECULAR_STRUCTURE, Node),
            Concept::Formula => (HAS_MOLECULAR_FORMULA, Plain),
            Concept::Atom => (HAS_ATOM, Node),
            Concept::Index => (HAS_INDEX, Typed(XSD_INTEGER)),
            Concept::Element => (HAS_ELEMENT, Plain),
            Concept::AtomicNumber => (HAS_ATOMIC_NUMBER, Typed(XSD_INTEGER)),
            Concept::X => (HAS_X_COORDINATE, Typed(XSD_DOUBLE)),
            Concept::Y => (HAS_Y_COORDINATE, Typed(XSD_DOUBLE)),
            Concept::Z => (HAS_Z_COORDINATE, Typed(XSD_DOUBLE)),
            Concept::ScfEnergy => (HAS_SCF_ENERGY, Node),
            Concept::HomoLumoGap => (HAS_HOMO_LUMO_GAP, Node),
            Concept::Value => (HAS_VALUE, Typed(XSD_DOUBLE)),
            Concept::Unit => (HAS_UNIT, Plain),
            Concept::Vibrations => (HAS_VIBRATIONAL_FREQUENCIES, Node),
            Concept::Frequency => (HAS_FREQUENCY, Node),
        }
    }

    pub const fn predicate(self) -> &'static str {
        self.mapping().0
    }
}
