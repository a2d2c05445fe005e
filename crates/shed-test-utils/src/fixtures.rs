//! Canned definition files used across test suites.

/// A minimal tool config with no dynamic parameters.
pub fn simple_tool(id: &str, version: &str, description: &str) -> String {
    format!(
        r#"<tool id="{id}" name="Filter" version="{version}">
    <description>{description}</description>
    <version_command>python filtering.py --version</version_command>
    <command interpreter="python">filtering.py $input $out_file1 "$cond"</command>
    <inputs>
        <param format="tabular" name="input" type="data" label="Filter"/>
        <param name="cond" size="40" type="text" value="c1=='chr22'" label="With following condition"/>
    </inputs>
    <outputs>
        <data format="input" name="out_file1" metadata_source="input"/>
    </outputs>
    <requirements>
        <requirement type="package" version="2.7">python</requirement>
    </requirements>
    <tests>
        <test>
            <param name="input" value="1.bed"/>
            <param name="cond" value="c1=='chr22'"/>
            <output name="out_file1" file="filter1_test1.bed"/>
        </test>
    </tests>
</tool>
"#
    )
}

/// A tool whose select parameter reads its options from `loc_file`.
pub fn tool_with_loc_file(id: &str, loc_file: &str) -> String {
    format!(
        r#"<tool id="{id}" name="Lookup" version="1.0.0">
    <description>against an index</description>
    <command>lookup.py $input $index</command>
    <inputs>
        <param name="input" type="data" format="fasta" label="Sequences"/>
        <param name="index" type="select" label="Index">
            <options from_file="{loc_file}">
                <column name="name" index="0"/>
                <column name="value" index="1"/>
            </options>
        </param>
    </inputs>
    <outputs>
        <data format="tabular" name="output"/>
    </outputs>
</tool>
"#
    )
}

/// A tool whose select parameter reads its options from a shared data table.
pub fn tool_with_data_table(id: &str, table: &str) -> String {
    format!(
        r#"<tool id="{id}" name="Mapper" version="1.0.0">
    <description>with a shared reference table</description>
    <command>map.py $input $ref</command>
    <inputs>
        <param name="input" type="data" format="fastqsanger" label="Reads"/>
        <conditional name="reference">
            <param name="source" type="select" label="Reference source">
                <option value="cached">Built-in</option>
                <option value="history">History</option>
            </param>
            <when value="cached">
                <param name="ref" type="select" label="Reference">
                    <options from_data_table="{table}"/>
                </param>
            </when>
        </conditional>
    </inputs>
    <outputs>
        <data format="sam" name="output"/>
    </outputs>
</tool>
"#
    )
}

/// A valid tool data table configuration sample declaring `table`.
pub fn tool_data_table_sample(table: &str) -> String {
    format!(
        r##"<tables>
    <table name="{table}" comment_char="#">
        <columns>value, dbkey, name, path</columns>
        <file path="tool-data/{table}.loc"/>
    </table>
</tables>
"##
    )
}

/// A datatype registration document with one code file and two datatypes.
pub fn datatypes_conf() -> String {
    r#"<?xml version="1.0"?>
<datatypes>
    <datatype_files>
        <datatype_file name="gmap.py"/>
    </datatype_files>
    <registration>
        <datatype extension="gmapdb" type="galaxy.datatypes.gmap:GmapDB" mimetype="application/octet-stream"/>
        <datatype extension="gmapsnpindex" type="galaxy.datatypes.gmap:GmapSnpIndex"/>
    </registration>
</datatypes>
"#
    .to_string()
}

/// An exported workflow document named `name`.
pub fn workflow(name: &str) -> String {
    format!(
        r#"{{
    "a_galaxy_workflow": "true",
    "annotation": "",
    "format-version": "0.1",
    "name": "{name}",
    "steps": {{}}
}}
"#
    )
}
