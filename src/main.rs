fn main()
{
    pigment_bin::main()
}
